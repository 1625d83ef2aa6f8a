//! Generic rendering of any atom.
//!
//! Walks every key valid for the atom's kind, reading each through the
//! getter matching its [`ValueType`], and descends into child atoms and
//! list elements. Attributes that are absent are skipped.

use std::fmt::{self, Write};

use lldp_core::format_hex;

use crate::atom::{Atom, ValueType};

/// Renders `atom` and everything below it as indented `key: value` lines.
pub fn dump(atom: &Atom) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_atom(&mut out, atom, 0);
    out
}

pub fn write_atom(out: &mut impl Write, atom: &Atom, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);

    if atom.kind().is_list() {
        if let Ok(children) = atom.children() {
            for (index, child) in children.enumerate() {
                writeln!(out, "{indent}{} #{index}:", child.kind())?;
                write_atom(out, &child, depth + 1)?;
            }
        }
        return Ok(());
    }

    for &key in atom.keys() {
        match key.value_type() {
            ValueType::Atom => {
                let Ok(child) = atom.get(key) else { continue };
                if child.kind().is_list() && child.count().ok() == Some(0) {
                    continue;
                }
                writeln!(out, "{indent}{key}:")?;
                write_atom(out, &child, depth + 1)?;
            }
            ValueType::Text | ValueType::Enum => {
                if let Ok(value) = atom.get_str(key) {
                    writeln!(out, "{indent}{key}: {value}")?;
                }
            }
            ValueType::Integer => {
                if let Ok(value) = atom.get_int(key) {
                    writeln!(out, "{indent}{key}: {value}")?;
                }
            }
            ValueType::Bytes => {
                if let Ok(value) = atom.get_buffer(key) {
                    writeln!(out, "{indent}{key}: {}", format_hex(&value, ':'))?;
                }
            }
        }
    }
    Ok(())
}
