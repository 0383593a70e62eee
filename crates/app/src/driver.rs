//! Executes parsed commands against a dispatcher.
//!
//! The dispatcher is created by the first `capacity` command (or up front
//! from `--capacity`). Before that, compactions and dumps have nothing to
//! act on and print nothing; an encode is an error.

use crate::error::{AppError, Result};
use crate::output;
use crate::script::Command;
use huffroute_core::metrics::Metrics;
use huffroute_core::{Capacity, Dispatcher};
use std::io::Write;

pub struct Driver {
    dispatcher: Option<Dispatcher>,
}

impl Driver {
    pub fn new(capacity: Option<Capacity>) -> Self {
        Self {
            dispatcher: capacity.map(Dispatcher::new),
        }
    }

    #[cfg(test)]
    pub fn dispatcher(&self) -> Option<&Dispatcher> {
        self.dispatcher.as_ref()
    }

    /// Run one command, writing any output lines to `out`.
    pub fn execute(&mut self, line: usize, command: &Command, out: &mut impl Write) -> Result<()> {
        tracing::trace!(line, %command, "executing");

        if let Command::Capacity(n) = command {
            let core_err = |source: huffroute_core::Error| AppError::Core { line, source };
            match self.dispatcher.as_mut() {
                Some(dispatcher) => dispatcher.set_capacity(*n).map_err(core_err)?,
                None => {
                    let capacity = Capacity::new(*n).map_err(core_err)?;
                    self.dispatcher = Some(Dispatcher::new(capacity));
                }
            }
            return Ok(());
        }

        let Some(dispatcher) = self.dispatcher.as_mut() else {
            if let Command::Encode(_) = command {
                return Err(AppError::CapacityNotSet { line });
            }
            return Ok(());
        };

        match command {
            Command::Capacity(_) => {}
            Command::Encode(name) => {
                dispatcher
                    .encode(name)
                    .map_err(|source| AppError::Core { line, source })?;
            }
            Command::CompactTrees => {
                dispatcher.compact_order_statistics_store();
            }
            Command::CompactHeap(k) => {
                let evicted = dispatcher.compact_heap_store(*k);
                output::write_heap_evictions(out, &evicted)?;
            }
            Command::DumpTree => output::write_tree(out, &dispatcher.dump_retained_tree())?,
            Command::DumpArea(area) => output::write_area(out, &dispatcher.dump_area(*area))?,
            Command::DumpHeap(k) => output::write_heap_dump(out, &dispatcher.dump_heap_preorder(*k))?,
        }
        Ok(())
    }

    /// Stop the clock; `None` if no command ever created a dispatcher.
    pub fn finish(&mut self) -> Option<&Metrics> {
        self.dispatcher.as_mut().map(Dispatcher::finish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    fn run(script: &str, capacity: Option<u32>) -> Result<(String, Driver)> {
        let mut driver = Driver::new(capacity.map(|n| Capacity::new(n).unwrap()));
        let mut buf = Vec::new();
        for (line, command) in parse_script(script)? {
            driver.execute(line, &command, &mut buf)?;
        }
        Ok((String::from_utf8(buf).unwrap(), driver))
    }

    #[test]
    fn test_alice_script() {
        let (out, driver) = run("capacity 10\nencode Alice\ndump-heap 3\ndump-tree\n", None).unwrap();
        assert_eq!(out, "7-946\nj\n2\nm\n5\nB\n3\nd\n2\nf\n");
        assert_eq!(driver.dispatcher().unwrap().metrics().routed_heap, 1);
    }

    #[test]
    fn test_compact_heap_prints_evictions() {
        let (out, _) = run("encode Alice\ncompact-heap 1\ndump-heap 5\n", Some(10)).unwrap();
        assert_eq!(out, "946-7\n");
    }

    #[test]
    fn test_encode_before_capacity() {
        let err = run("dump-tree\nencode Alice\n", None).err().unwrap();
        assert!(matches!(err, AppError::CapacityNotSet { line: 2 }));
    }

    #[test]
    fn test_zero_capacity_line() {
        let err = run("capacity 0\n", None).err().unwrap();
        assert_eq!(err.to_string(), "line 1: invalid capacity 0: must be at least 1");
    }

    #[test]
    fn test_capacity_override_keeps_state() {
        let (out, driver) = run("encode Alice\ncapacity 1\nencode Alice\ndump-heap 9\n", Some(10)).unwrap();
        // area 7 keeps the older recency stamp, so it stays on top
        assert_eq!(out, "7-946\n1-946\n");
        assert_eq!(driver.dispatcher().unwrap().capacity().get(), 1);
    }

    #[test]
    fn test_finish_without_dispatcher() {
        let (_, mut driver) = run("dump-area 1\n", None).unwrap();
        assert!(driver.finish().is_none());
    }
}
