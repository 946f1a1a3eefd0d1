//! Minimal PDF document assembly on top of `lopdf`.

use super::image::{fit_centered, RgbImage};
use super::layout::{
    encode_win_ansi, first_baseline, lines_per_page, text_width, CONTENT_HEIGHT, CONTENT_WIDTH,
    FONT_SIZE, LEADING, MARGIN, PAGE_HEIGHT, PAGE_WIDTH,
};
use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;

const FONT_NAME: &str = "F1";
const IMAGE_NAME: &str = "Im1";

/// Builds a report page by page.
pub struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    kids: Vec<Object>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });

        Self {
            doc,
            pages_id,
            font_id,
            kids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Left-aligned body text, continuing onto further pages as needed.
    pub fn add_text(&mut self, lines: &[String]) -> Result<()> {
        if lines.is_empty() {
            return self.add_text_page(&[]);
        }
        for page_lines in lines.chunks(lines_per_page()) {
            self.add_text_page(page_lines)?;
        }
        Ok(())
    }

    fn add_text_page(&mut self, lines: &[String]) -> Result<()> {
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![FONT_NAME.into(), Object::Integer(FONT_SIZE)]),
            Operation::new("TL", vec![Object::Integer(LEADING)]),
            Operation::new(
                "Td",
                vec![Object::Integer(MARGIN), Object::Integer(first_baseline())],
            ),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                ops.push(Operation::new("T*", vec![]));
            }
            if !line.is_empty() {
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(line))],
                ));
            }
        }
        ops.push(Operation::new("ET", vec![]));

        self.push_page(ops, None)
    }

    /// One page with each line centered horizontally, the block centered vertically.
    pub fn add_centered_page(&mut self, lines: &[String]) -> Result<()> {
        let block_height = lines.len() as i64 * LEADING;
        let top = PAGE_HEIGHT / 2 + block_height / 2 - FONT_SIZE;

        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![FONT_NAME.into(), Object::Integer(FONT_SIZE)]),
        ];
        let mut previous_x = 0;
        for (i, line) in lines.iter().enumerate() {
            let x = ((PAGE_WIDTH - text_width(line.chars().count())) / 2).max(MARGIN);
            let dy = if i == 0 { top } else { -LEADING };
            ops.push(Operation::new(
                "Td",
                vec![Object::Integer(x - previous_x), Object::Integer(dy)],
            ));
            previous_x = x;
            if !line.is_empty() {
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(encode_win_ansi(line))],
                ));
            }
        }
        ops.push(Operation::new("ET", vec![]));

        self.push_page(ops, None)
    }

    /// One page holding the image scaled to fit inside the margins, centered.
    pub fn add_image_page(&mut self, image: RgbImage) -> Result<()> {
        let (x, y, width, height) = fit_centered(
            image.width,
            image.height,
            MARGIN,
            MARGIN,
            CONTENT_WIDTH,
            CONTENT_HEIGHT,
        );

        let xobject = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(image.width as i64),
                "Height" => Object::Integer(image.height as i64),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => Object::Integer(8),
            },
            image.pixels,
        );
        let image_id = self.doc.add_object(xobject);

        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(height),
                    Object::Integer(x),
                    Object::Integer(y),
                ],
            ),
            Operation::new("Do", vec![IMAGE_NAME.into()]),
            Operation::new("Q", vec![]),
        ];

        self.push_page(ops, Some(image_id))
    }

    fn push_page(&mut self, operations: Vec<Operation>, image: Option<ObjectId>) -> Result<()> {
        let content = Content { operations }
            .encode()
            .context("Failed to encode page content")?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let mut resources = dictionary! {
            "Font" => dictionary! { FONT_NAME => self.font_id },
        };
        if let Some(image_id) = image {
            resources.set("XObject", dictionary! { IMAGE_NAME => image_id });
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.kids.push(page_id.into());
        Ok(())
    }

    /// Close the page tree and serialize the document into `writer`.
    pub fn finish<W: Write>(mut self, compress: bool, writer: &mut W) -> Result<usize> {
        if self.kids.is_empty() {
            self.add_text_page(&[])?;
        }
        let page_count = self.kids.len();

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => self.kids,
            "Count" => Object::Integer(page_count as i64),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        if compress {
            self.doc.compress();
        }
        self.doc
            .save_to(writer)
            .context("Failed to write PDF document")?;
        Ok(page_count)
    }
}

impl Default for PdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}
