//! Console rendering of dispatcher results.
//!
//! ```text
//! dump-tree     one symbol or weight per line, in order
//! dump-area     one code per line, ascending
//! compact-heap  <code>-<area> per evicted entity
//! dump-heap     <area>-<code> per listed entity
//! ```

use huffroute_core::heap_store::HeapEviction;
use huffroute_core::huffman::TreeItem;
use huffroute_core::{AreaId, Entity};
use std::io::{self, Write};

pub fn write_tree(out: &mut impl Write, items: &[TreeItem]) -> io::Result<()> {
    for item in items {
        writeln!(out, "{}", item)?;
    }
    Ok(())
}

pub fn write_area(out: &mut impl Write, codes: &[u32]) -> io::Result<()> {
    for code in codes {
        writeln!(out, "{}", code)?;
    }
    Ok(())
}

pub fn write_heap_evictions(out: &mut impl Write, evictions: &[HeapEviction]) -> io::Result<()> {
    for eviction in evictions {
        writeln!(out, "{}-{}", eviction.entity.code(), eviction.area)?;
    }
    Ok(())
}

pub fn write_heap_dump(out: &mut impl Write, entries: &[(AreaId, &Entity)]) -> io::Result<()> {
    for (area, entity) in entries {
        writeln!(out, "{}-{}", area, entity.code())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_tree_lines() {
        let items = [TreeItem::Symbol('a'), TreeItem::Weight(3), TreeItem::Symbol('B')];
        assert_eq!(render(|out| write_tree(out, &items)), "a\n3\nB\n");
    }

    #[test]
    fn test_heap_formats() {
        let entity = Entity::new("Alice", 946);
        let evictions = [HeapEviction {
            area: 7,
            entity: entity.clone(),
        }];
        assert_eq!(render(|out| write_heap_evictions(out, &evictions)), "946-7\n");
        assert_eq!(render(|out| write_heap_dump(out, &[(7, &entity)])), "7-946\n");
    }

    #[test]
    fn test_empty_area_prints_nothing() {
        assert_eq!(render(|out| write_area(out, &[])), "");
    }
}
