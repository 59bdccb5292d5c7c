//! Generates the churn-prediction project-plan PDF.
//!
//! A minimal self-contained PDF writer (objects, xref, built-in
//! fonts) plus an FPDF-style cursor layout with automatic page
//! breaks, used by [`plan::write_plan_file`] to render one hardcoded
//! project-plan text to disk. [`reader::PdfReader`] parses generated
//! files back for verification.

pub mod compose;
pub mod document;
pub mod error;
pub mod fonts;
pub mod objects;
pub mod plan;
pub mod reader;
pub mod writer;

pub use compose::{Align, Composer};
pub use document::PdfDocument;
pub use error::{Error, Result};
pub use fonts::Font;
pub use plan::{write_plan, write_plan_file, PlanConfig, PLAN_BODY, PLAN_TITLE};
pub use reader::PdfReader;
