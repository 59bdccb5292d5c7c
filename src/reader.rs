//! Parse-back verification for generated documents.
//!
//! Reads the classic xref table and trailer to resolve the page
//! count, and walks content streams to recover the show-text strings
//! in document order. This is deliberately scoped to the output of
//! this crate's writer (plus any PDF 1.0-1.4 file with a traditional
//! xref table); cross-reference streams are out of scope.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use flate2::read::ZlibDecoder;

use crate::error::{Error, Result};

/// Reads back a generated PDF.
pub struct PdfReader {
    data: Vec<u8>,
    xref: HashMap<u32, usize>,
    version: String,
    page_count: usize,
}

impl PdfReader {
    /// Open a PDF from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(std::fs::read(path.as_ref())?)
    }

    /// Parse a PDF from raw bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let version = parse_version(&data)?;
        let xref_offset = find_startxref(&data)?;
        let xref = parse_xref_table(&data, xref_offset)?;
        let root = trailer_ref(&data, xref_offset, "Root").ok_or(Error::MalformedTrailer)?;
        let page_count = resolve_page_count(&data, &xref, root)?;
        Ok(PdfReader {
            data,
            xref,
            version,
            page_count,
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// PDF version string (e.g. `"1.7"`).
    pub fn pdf_version(&self) -> &str {
        &self.version
    }

    /// All show-text (`Tj`) strings across every content stream, in
    /// document order. FlateDecode streams are inflated first.
    pub fn text_chunks(&self) -> Result<Vec<String>> {
        let mut chunks = Vec::new();
        let mut nums: Vec<u32> = self.xref.keys().copied().collect();
        nums.sort_unstable();
        for num in nums {
            if let Some((dict, data)) = self.stream_at(self.xref[&num])? {
                let ops = if dict.contains("/FlateDecode") {
                    let mut inflated = Vec::new();
                    ZlibDecoder::new(&data[..])
                        .read_to_end(&mut inflated)
                        .map_err(|_| Error::UnresolvableObject(num))?;
                    inflated
                } else {
                    data.to_vec()
                };
                collect_show_text(&ops, &mut chunks);
            }
        }
        Ok(chunks)
    }

    /// All shown text joined with newlines. Each cell the composer
    /// writes becomes one line here.
    pub fn extract_text(&self) -> Result<String> {
        Ok(self.text_chunks()?.join("\n"))
    }

    /// If the object at `offset` is a stream, return its dictionary
    /// text and raw stream bytes.
    fn stream_at(&self, offset: usize) -> Result<Option<(String, &[u8])>> {
        if offset >= self.data.len() {
            return Err(Error::MalformedXref);
        }
        let slice = &self.data[offset..];
        let body = skip_obj_header(slice).ok_or(Error::MalformedXref)?;
        let body = skip_whitespace(body);
        if !body.starts_with(b"<<") {
            return Ok(None);
        }
        let (dict_bytes, after_dict) = split_dict(body).ok_or(Error::MalformedXref)?;
        let after_dict = skip_whitespace(after_dict);
        if !after_dict.starts_with(b"stream") {
            return Ok(None);
        }
        let dict = String::from_utf8_lossy(dict_bytes).into_owned();
        let length = dict_integer(&dict, "Length").ok_or(Error::MalformedXref)?;
        // Stream data begins after the EOL following the keyword.
        let rest = &after_dict[b"stream".len()..];
        let data_start = match rest.first() {
            Some(b'\n') => 1,
            Some(b'\r') if rest.get(1) == Some(&b'\n') => 2,
            _ => 0,
        };
        let data = rest
            .get(data_start..data_start + length)
            .ok_or(Error::MalformedXref)?;
        Ok(Some((dict, data)))
    }
}

/// Extract the PDF version from the `%PDF-x.y` header.
fn parse_version(data: &[u8]) -> Result<String> {
    if data.len() < 8 || !data.starts_with(b"%PDF-") {
        return Err(Error::NotAPdf);
    }
    let rest = &data[5..];
    let end = rest
        .iter()
        .position(|&b| b.is_ascii_whitespace())
        .unwrap_or(rest.len());
    std::str::from_utf8(&rest[..end])
        .map(str::to_string)
        .map_err(|_| Error::NotAPdf)
}

/// Locate the xref offset via the `startxref` keyword near the end
/// of the file.
fn find_startxref(data: &[u8]) -> Result<usize> {
    let tail_start = data.len().saturating_sub(1024);
    let tail = &data[tail_start..];
    let keyword = b"startxref";
    let pos = tail
        .windows(keyword.len())
        .rposition(|w| w == keyword)
        .ok_or(Error::StartxrefNotFound)?;
    let after = skip_whitespace(&tail[pos + keyword.len()..]);
    let end = after
        .iter()
        .position(|&b| !b.is_ascii_digit())
        .unwrap_or(after.len());
    let offset: usize = std::str::from_utf8(&after[..end])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(Error::StartxrefNotFound)?;
    if offset >= data.len() {
        return Err(Error::StartxrefNotFound);
    }
    Ok(offset)
}

/// Parse the traditional xref table: subsection headers of
/// `{first} {count}` followed by 20-byte entries.
fn parse_xref_table(data: &[u8], xref_offset: usize) -> Result<HashMap<u32, usize>> {
    let section = skip_whitespace(&data[xref_offset..]);
    // Cross-reference streams (PDF 1.5+) start with "N 0 obj" here.
    if !section.starts_with(b"xref") {
        return Err(Error::MalformedXref);
    }
    let mut cursor = skip_whitespace(&section[b"xref".len()..]);

    let mut map = HashMap::new();
    loop {
        if cursor.is_empty() || cursor.starts_with(b"trailer") {
            break;
        }
        let (first, rest) = read_number(cursor).ok_or(Error::MalformedXref)?;
        let (count, rest) = read_number(skip_whitespace(rest)).ok_or(Error::MalformedXref)?;
        let entries = skip_line(rest);
        if entries.len() < count * 20 {
            return Err(Error::MalformedXref);
        }
        for i in 0..count {
            let entry = &entries[i * 20..(i + 1) * 20];
            if entry[17] == b'n' {
                let offset: usize = std::str::from_utf8(&entry[..10])
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(Error::MalformedXref)?;
                let num = first as u32 + i as u32;
                if num > 0 {
                    map.insert(num, offset);
                }
            }
        }
        cursor = skip_whitespace(&entries[count * 20..]);
    }
    Ok(map)
}

/// Read an indirect-reference value (`/Key N G R`) out of the
/// trailer dictionary, returning the object number.
fn trailer_ref(data: &[u8], xref_offset: usize, key: &str) -> Option<u32> {
    let section = &data[xref_offset..];
    let pos = section.windows(7).position(|w| w == b"trailer")?;
    let trailer = &section[pos..];
    let end = trailer
        .windows(9)
        .position(|w| w == b"startxref")
        .unwrap_or(trailer.len());
    let text = String::from_utf8_lossy(&trailer[..end]);
    dict_ref(&text, key)
}

/// Follow catalog → pages to read `/Count`.
fn resolve_page_count(data: &[u8], xref: &HashMap<u32, usize>, root: u32) -> Result<usize> {
    let catalog = object_text(data, xref, root)?;
    let pages_num = dict_ref(&catalog, "Pages").ok_or(Error::MalformedPageTree)?;
    let pages = object_text(data, xref, pages_num)?;
    dict_integer(&pages, "Count").ok_or(Error::MalformedPageTree)
}

/// Resolve an object by number and return its dictionary text.
fn object_text(data: &[u8], xref: &HashMap<u32, usize>, num: u32) -> Result<String> {
    let &offset = xref.get(&num).ok_or(Error::UnresolvableObject(num))?;
    if offset >= data.len() {
        return Err(Error::UnresolvableObject(num));
    }
    let body = skip_obj_header(&data[offset..]).ok_or(Error::UnresolvableObject(num))?;
    let body = skip_whitespace(body);
    let (dict_bytes, _) = split_dict(body).ok_or(Error::UnresolvableObject(num))?;
    Ok(String::from_utf8_lossy(dict_bytes).into_owned())
}

/// Pull an integer value for `/Key` out of flat dictionary text.
fn dict_integer(dict: &str, key: &str) -> Option<usize> {
    let needle = format!("/{} ", key);
    let pos = dict.find(&needle)? + needle.len();
    let rest = &dict[pos..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Pull the object number of a `/Key N G R` reference out of flat
/// dictionary text.
fn dict_ref(dict: &str, key: &str) -> Option<u32> {
    let needle = format!("/{} ", key);
    let pos = dict.find(&needle)? + needle.len();
    let mut tokens = dict[pos..].split_ascii_whitespace();
    let num: u32 = tokens.next()?.parse().ok()?;
    let _gen = tokens.next()?;
    (tokens.next()? == "R").then_some(num)
}

/// Scan content stream operators for `(...) Tj`, unescaping and
/// collecting each shown string.
fn collect_show_text(ops: &[u8], out: &mut Vec<String>) {
    let mut i = 0;
    while i < ops.len() {
        if ops[i] != b'(' {
            i += 1;
            continue;
        }
        let Some((raw, after)) = read_literal_string(&ops[i..]) else {
            i += 1;
            continue;
        };
        let rest = skip_whitespace(&ops[i + after..]);
        if rest.starts_with(b"Tj") {
            out.push(unescape_text(&raw));
        }
        i += after;
    }
}

/// Read a `(...)` literal, handling escapes and nested parens.
/// Returns the raw inner bytes and the total length consumed.
fn read_literal_string(data: &[u8]) -> Option<(Vec<u8>, usize)> {
    debug_assert!(data.starts_with(b"("));
    let mut inner = Vec::new();
    let mut depth = 1usize;
    let mut i = 1;
    while i < data.len() {
        match data[i] {
            b'\\' => {
                if i + 1 < data.len() {
                    inner.push(data[i]);
                    inner.push(data[i + 1]);
                }
                i += 2;
            }
            b'(' => {
                depth += 1;
                inner.push(b'(');
                i += 1;
            }
            b')' => {
                depth -= 1;
                i += 1;
                if depth == 0 {
                    return Some((inner, i));
                }
                inner.push(b')');
            }
            b => {
                inner.push(b);
                i += 1;
            }
        }
    }
    None
}

/// Reverse the writer's literal-string escaping.
fn unescape_text(raw: &[u8]) -> String {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\\' && i + 1 < raw.len() {
            out.push(raw[i + 1]);
            i += 2;
        } else {
            out.push(raw[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Skip a `N G obj` header, returning the bytes after `obj`.
fn skip_obj_header(data: &[u8]) -> Option<&[u8]> {
    let (_, rest) = read_number(skip_whitespace(data))?;
    let (_, rest) = read_number(skip_whitespace(rest))?;
    let rest = skip_whitespace(rest);
    rest.starts_with(b"obj").then(|| &rest[3..])
}

/// Split a `<<...>>` block (nesting-aware) into the dict bytes and
/// the remainder.
fn split_dict(data: &[u8]) -> Option<(&[u8], &[u8])> {
    if !data.starts_with(b"<<") {
        return None;
    }
    let mut depth = 0usize;
    let mut i = 0;
    while i < data.len() {
        if data[i..].starts_with(b"<<") {
            depth += 1;
            i += 2;
        } else if data[i..].starts_with(b">>") {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return Some((&data[..i], &data[i..]));
            }
        } else {
            i += 1;
        }
    }
    None
}

fn read_number(data: &[u8]) -> Option<(usize, &[u8])> {
    let end = data.iter().position(|b| !b.is_ascii_digit())?;
    if end == 0 {
        return None;
    }
    let num = std::str::from_utf8(&data[..end]).ok()?.parse().ok()?;
    Some((num, &data[end..]))
}

fn skip_whitespace(data: &[u8]) -> &[u8] {
    let pos = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    &data[pos..]
}

/// Skip past the end of the current line.
fn skip_line(data: &[u8]) -> &[u8] {
    match data.iter().position(|&b| b == b'\n') {
        Some(pos) => &data[pos + 1..],
        None => &data[data.len()..],
    }
}
