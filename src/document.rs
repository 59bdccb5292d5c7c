use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
use crate::fonts::Font;
use crate::objects::{ObjId, Object};
use crate::writer::PdfWriter;

const CATALOG_OBJ: ObjId = ObjId(1, 0);
const PAGES_OBJ: ObjId = ObjId(2, 0);
const FIRST_FONT_OBJ_NUM: u32 = 3;
const FIRST_PAGE_OBJ_NUM: u32 = FIRST_FONT_OBJ_NUM + Font::ALL.len() as u32;

/// Incremental PDF document writer.
///
/// Generic over `Write` so it works with files (`BufWriter<File>`),
/// in-memory buffers (`Vec<u8>`), or any other writer.
///
/// Pages are flushed as they are closed: `end_page` writes the page's
/// content stream and dictionary and frees the buffered operators.
/// The shared font objects go out immediately after the header, so
/// the only per-document state held until `end_document` is the list
/// of page object ids.
pub struct PdfDocument<W: Write> {
    writer: PdfWriter<W>,
    info: Vec<(String, String)>,
    page_ids: Vec<ObjId>,
    page: Option<OpenPage>,
    next_obj_num: u32,
    compress: bool,
}

struct OpenPage {
    width_pt: f64,
    height_pt: f64,
    ops: Vec<u8>,
}

impl PdfDocument<BufWriter<File>> {
    /// Create a document that writes to a file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> PdfDocument<W> {
    /// Create a document over the given writer. Writes the header and
    /// the shared font objects immediately.
    pub fn new(writer: W) -> Result<Self> {
        let mut pdf = PdfWriter::new(writer);
        pdf.write_header()?;

        for (i, font) in Font::ALL.iter().enumerate() {
            let obj = Object::dict(vec![
                ("Type", Object::name("Font")),
                ("Subtype", Object::name("Type1")),
                ("BaseFont", Object::name(font.base_name())),
            ]);
            pdf.write_object(ObjId(FIRST_FONT_OBJ_NUM + i as u32, 0), &obj)?;
        }

        Ok(PdfDocument {
            writer: pdf,
            info: Vec::new(),
            page_ids: Vec::new(),
            page: None,
            next_obj_num: FIRST_PAGE_OBJ_NUM,
            compress: false,
        })
    }

    /// Enable or disable FlateDecode compression of page content
    /// streams. Off by default so the output stays inspectable.
    pub fn set_compression(&mut self, on: bool) {
        self.compress = on;
    }

    /// Add a document info entry (e.g. "Title", "Creator").
    pub fn set_info(&mut self, key: &str, value: &str) {
        self.info.push((key.to_string(), value.to_string()));
    }

    /// Begin a new page with the given dimensions in points. A page
    /// that is still open is closed first.
    pub fn begin_page(&mut self, width_pt: f64, height_pt: f64) -> Result<()> {
        if self.page.is_some() {
            self.end_page()?;
        }
        self.page = Some(OpenPage {
            width_pt,
            height_pt,
            ops: Vec::new(),
        });
        Ok(())
    }

    /// Append raw content stream operators to the current page.
    pub fn push_ops(&mut self, ops: &[u8]) -> Result<()> {
        let page = self.page.as_mut().ok_or(Error::NoOpenPage)?;
        page.ops.extend_from_slice(ops);
        Ok(())
    }

    /// Number of pages begun so far, including the open one.
    pub fn page_count(&self) -> usize {
        self.page_ids.len() + usize::from(self.page.is_some())
    }

    /// Close the current page: write its content stream and page
    /// dictionary, freeing the buffered operators.
    pub fn end_page(&mut self) -> Result<()> {
        let page = self.page.take().ok_or(Error::NoOpenPage)?;

        let content_id = self.next_id();
        let page_id = self.next_id();

        let content = if self.compress {
            let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
            enc.write_all(&page.ops)?;
            Object::stream(
                vec![("Filter", Object::name("FlateDecode"))],
                enc.finish()?,
            )
        } else {
            Object::stream(vec![], page.ops)
        };
        self.writer.write_object(content_id, &content)?;

        let fonts: Vec<(&str, Object)> = Font::ALL
            .iter()
            .enumerate()
            .map(|(i, font)| {
                (
                    font.resource_name(),
                    Object::Ref(ObjId(FIRST_FONT_OBJ_NUM + i as u32, 0)),
                )
            })
            .collect();

        let page_dict = Object::dict(vec![
            ("Type", Object::name("Page")),
            ("Parent", Object::Ref(PAGES_OBJ)),
            (
                "MediaBox",
                Object::array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width_pt),
                    Object::Real(page.height_pt),
                ]),
            ),
            ("Contents", Object::Ref(content_id)),
            ("Resources", Object::dict(vec![("Font", Object::dict(fonts))])),
        ]);
        self.writer.write_object(page_id, &page_dict)?;

        self.page_ids.push(page_id);
        Ok(())
    }

    /// Finish the document: pages tree, catalog, info dictionary,
    /// xref and trailer. Consumes self and returns the inner writer.
    pub fn end_document(mut self) -> Result<W> {
        if self.page.is_some() {
            self.end_page()?;
        }

        let info_id = if self.info.is_empty() {
            None
        } else {
            let id = self.next_id();
            let entries: Vec<(String, Object)> = self
                .info
                .iter()
                .map(|(k, v)| (k.clone(), Object::text(v)))
                .collect();
            self.writer.write_object(id, &Object::Dict(entries))?;
            Some(id)
        };

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| Object::Ref(id)).collect();
        let pages = Object::dict(vec![
            ("Type", Object::name("Pages")),
            ("Kids", Object::array(kids)),
            ("Count", Object::Integer(self.page_ids.len() as i64)),
        ]);
        self.writer.write_object(PAGES_OBJ, &pages)?;

        let catalog = Object::dict(vec![
            ("Type", Object::name("Catalog")),
            ("Pages", Object::Ref(PAGES_OBJ)),
        ]);
        self.writer.write_object(CATALOG_OBJ, &catalog)?;

        self.writer.write_trailer(CATALOG_OBJ, info_id)?;
        Ok(self.writer.into_inner())
    }

    fn next_id(&mut self) -> ObjId {
        let id = ObjId(self.next_obj_num, 0);
        self.next_obj_num += 1;
        id
    }
}
