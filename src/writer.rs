use std::io::{self, Write};

use crate::objects::{ObjId, Object};

/// Low-level PDF serializer. Writes indirect objects to any `Write`
/// target while tracking byte offsets for the cross-reference table.
pub struct PdfWriter<W: Write> {
    out: W,
    offset: usize,
    offsets: Vec<(u32, usize)>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(out: W) -> Self {
        PdfWriter {
            out,
            offset: 0,
            offsets: Vec::new(),
        }
    }

    fn emit(&mut self, data: &[u8]) -> io::Result<()> {
        self.out.write_all(data)?;
        self.offset += data.len();
        Ok(())
    }

    fn emit_str(&mut self, s: &str) -> io::Result<()> {
        self.emit(s.as_bytes())
    }

    /// Write the PDF 1.7 header. The second line is a comment of
    /// four bytes above 127 so transfer tools treat the file as
    /// binary.
    pub fn write_header(&mut self) -> io::Result<()> {
        self.emit(b"%PDF-1.7\n")?;
        self.emit(b"%\xe2\xe3\xcf\xd3\n")
    }

    /// Write one indirect object, recording its offset for the xref.
    pub fn write_object(&mut self, id: ObjId, obj: &Object) -> io::Result<()> {
        self.offsets.push((id.0, self.offset));
        self.emit_str(&format!("{} {} obj\n", id.0, id.1))?;
        self.write_value(obj)?;
        self.emit(b"\nendobj\n")
    }

    fn write_dict_entries(&mut self, entries: &[(String, Object)]) -> io::Result<()> {
        for (key, val) in entries {
            self.emit_str(&format!(" /{} ", key))?;
            self.write_value(val)?;
        }
        Ok(())
    }

    fn write_value(&mut self, obj: &Object) -> io::Result<()> {
        match obj {
            Object::Integer(n) => self.emit_str(&n.to_string()),
            Object::Real(v) => self.emit_str(&format_real(*v)),
            Object::Name(name) => self.emit_str(&format!("/{}", name)),
            Object::Text(s) => {
                self.emit(b"(")?;
                self.emit_str(&escape_text(s))?;
                self.emit(b")")
            }
            Object::Array(items) => {
                self.emit(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.emit(b" ")?;
                    }
                    self.write_value(item)?;
                }
                self.emit(b"]")
            }
            Object::Dict(entries) => {
                self.emit(b"<<")?;
                self.write_dict_entries(entries)?;
                self.emit(b" >>")
            }
            Object::Stream { dict, data } => {
                self.emit(b"<<")?;
                self.write_dict_entries(dict)?;
                self.emit_str(&format!(" /Length {} >>\nstream\n", data.len()))?;
                self.emit(data)?;
                self.emit(b"\nendstream")
            }
            Object::Ref(id) => self.emit_str(&format!("{} {} R", id.0, id.1)),
        }
    }

    /// Write the xref table, trailer, startxref, and `%%EOF`.
    pub fn write_trailer(&mut self, root: ObjId, info: Option<ObjId>) -> io::Result<()> {
        let xref_offset = self.offset;

        let size = self
            .offsets
            .iter()
            .map(|&(num, _)| num + 1)
            .max()
            .unwrap_or(1);

        // Slot per object number; unwritten numbers become free
        // entries.
        let mut slots: Vec<Option<usize>> = vec![None; size as usize];
        for &(num, off) in &self.offsets {
            slots[num as usize] = Some(off);
        }

        self.emit_str(&format!("xref\n0 {}\n", size))?;
        // Entries are exactly 20 bytes each, CRLF-terminated.
        self.emit(b"0000000000 65535 f\r\n")?;
        for slot in slots.iter().skip(1) {
            match slot {
                Some(off) => self.emit_str(&format!("{:010} 00000 n\r\n", off))?,
                None => self.emit(b"0000000000 00000 f\r\n")?,
            }
        }

        self.emit_str(&format!(
            "trailer\n<< /Size {} /Root {} {} R",
            size, root.0, root.1
        ))?;
        if let Some(info) = info {
            self.emit_str(&format!(" /Info {} {} R", info.0, info.1))?;
        }
        self.emit_str(&format!(" >>\nstartxref\n{}\n%%EOF\n", xref_offset))
    }

    /// Return the inner writer, consuming this PdfWriter.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Escape the characters with special meaning inside a PDF literal
/// string.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => out.push(c),
        }
    }
    out
}

/// Format a float for PDF output: no trailing zeros, no scientific
/// notation.
fn format_real(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{:.1}", v)
    } else {
        let s = format!("{:.6}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format a coordinate for content stream operators. Integral values
/// print without a decimal point.
pub(crate) fn format_coord(v: f64) -> String {
    if v == v.floor() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_marks_file_as_binary() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        assert!(buf.starts_with(b"%PDF-1.7\n%"));
        assert!(buf[10..14].iter().all(|&b| b >= 128));
    }

    #[test]
    fn dict_serializes_in_insertion_order() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        let obj = Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::Ref(ObjId(2, 0))),
        ]);
        w.write_object(ObjId(1, 0), &obj).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n"));
    }

    #[test]
    fn stream_gets_length_entry() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        let obj = Object::stream(vec![], b"BT ET".to_vec());
        w.write_object(ObjId(3, 0), &obj).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("/Length 5 >>\nstream\nBT ET\nendstream"));
    }

    #[test]
    fn xref_entries_are_20_bytes() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        w.write_object(ObjId(1, 0), &Object::name("Catalog")).unwrap();
        w.write_trailer(ObjId(1, 0), None).unwrap();

        let marker = b"xref\n0 2\n";
        let pos = buf
            .windows(marker.len())
            .position(|win| win == marker)
            .unwrap();
        let entries = &buf[pos + marker.len()..];
        assert_eq!(&entries[18..20], b"\r\n");
        assert_eq!(&entries[38..40], b"\r\n");
    }

    #[test]
    fn trailer_references_root_and_info() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        w.write_object(ObjId(1, 0), &Object::name("Catalog")).unwrap();
        let info = Object::dict(vec![("Title", Object::text("plan"))]);
        w.write_object(ObjId(2, 0), &info).unwrap();
        w.write_trailer(ObjId(1, 0), Some(ObjId(2, 0))).unwrap();

        let out = String::from_utf8_lossy(&buf).into_owned();
        assert!(out.contains("/Size 3"));
        assert!(out.contains("/Root 1 0 R"));
        assert!(out.contains("/Info 2 0 R"));
        assert!(out.ends_with("%%EOF\n"));
    }

    #[test]
    fn unwritten_object_numbers_become_free_entries() {
        let mut buf = Vec::new();
        let mut w = PdfWriter::new(&mut buf);
        w.write_header().unwrap();
        w.write_object(ObjId(1, 0), &Object::name("Catalog")).unwrap();
        w.write_object(ObjId(3, 0), &Object::Integer(7)).unwrap();
        w.write_trailer(ObjId(1, 0), None).unwrap();

        let out = String::from_utf8_lossy(&buf).into_owned();
        assert!(out.contains("xref\n0 4\n"));
        // Object 2 was never written.
        assert!(out.contains("0000000000 00000 f\r\n"));
    }

    #[test]
    fn literal_string_escaping() {
        assert_eq!(escape_text("plain"), "plain");
        assert_eq!(escape_text("a(b)c"), "a\\(b\\)c");
        assert_eq!(escape_text("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn real_and_coord_formatting() {
        assert_eq!(format_real(841.0), "841.0");
        assert_eq!(format_real(595.2755905), "595.275591");
        assert_eq!(format_coord(28.0), "28");
        assert_eq!(format_coord(28.3465), "28.3465");
        assert_eq!(format_coord(28.3400), "28.34");
    }
}
