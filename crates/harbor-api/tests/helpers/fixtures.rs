//! Test fixtures: small PNG, PDF and text blobs.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Encoded PNG of the given size, filled with one color.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([30, 90, 160]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}

/// PNG padded with trailing bytes to exactly `size` bytes. Decoders ignore
/// data after IEND.
pub fn create_png_of_size(size: usize) -> Vec<u8> {
    let mut png = create_test_png(4, 4);
    assert!(png.len() <= size, "fixture PNG larger than requested size");
    png.resize(size, 0);
    png
}

/// Minimal valid PDF.
pub fn create_test_pdf() -> Vec<u8> {
    b"%PDF-1.4
1 0 obj
<< /Type /Catalog /Pages 2 0 R >>
endobj
2 0 obj
<< /Type /Pages /Kids [3 0 R] /Count 1 >>
endobj
3 0 obj
<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >>
endobj
xref
0 4
0000000000 65535 f 
0000000009 00000 n 
0000000058 00000 n 
0000000115 00000 n 
trailer
<< /Size 4 /Root 1 0 R >>
startxref
178
%%EOF
"
    .to_vec()
}

pub fn readme_text() -> Vec<u8> {
    b"Harbor inspection notes\nHull plating checked\nLifeboats serviced".to_vec()
}
