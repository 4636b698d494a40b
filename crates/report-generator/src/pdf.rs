//! PDF backend: draws paginated elements with the built-in Helvetica faces.

use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfLayerReference, Point, Rgb,
};

use crate::chart::ChartImage;
use crate::layout::{paginate, Element, TextStyle, PAGE_HEIGHT, PAGE_WIDTH};
use crate::report::ReportDocument;
use crate::ReportError;

const MM_PER_INCH: f32 = 25.4;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn for_style(&self, style: TextStyle) -> &IndirectFontRef {
        match style {
            TextStyle::Header | TextStyle::Heading => &self.bold,
            TextStyle::Notice | TextStyle::Footer => &self.italic,
            TextStyle::Body | TextStyle::Link => &self.regular,
        }
    }
}

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn style_color(style: TextStyle) -> Color {
    match style {
        TextStyle::Link => rgb(0.0, 0.0, 1.0),
        TextStyle::Footer => rgb(0.4, 0.4, 0.4),
        _ => rgb(0.0, 0.0, 0.0),
    }
}

pub fn render(doc: &ReportDocument) -> Result<Vec<u8>, ReportError> {
    let pages = paginate(doc);
    let (pdf, first_page, first_layer) =
        PdfDocument::new(doc.title(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let fonts = Fonts {
        regular: pdf.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: pdf.add_builtin_font(BuiltinFont::HelveticaBold)?,
        italic: pdf.add_builtin_font(BuiltinFont::HelveticaOblique)?,
    };

    for (i, page) in pages.iter().enumerate() {
        let layer = if i == 0 {
            pdf.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = pdf.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            pdf.get_page(page_idx).get_layer(layer_idx)
        };

        for element in &page.elements {
            draw(&layer, &fonts, element)?;
        }
    }

    tracing::debug!("Rendered {} page(s)", pages.len());
    Ok(pdf.save_to_bytes()?)
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, element: &Element<'_>) -> Result<(), ReportError> {
    match element {
        Element::Text { x, y, style, text } => {
            layer.set_fill_color(style_color(*style));
            layer.use_text(text.as_str(), style.size(), Mm(*x), Mm(*y), fonts.for_style(*style));
        }
        Element::Cell { x, y, width, height } => {
            layer.set_outline_color(rgb(0.0, 0.0, 0.0));
            layer.set_outline_thickness(0.5);
            let corners = [(*x, *y), (*x + *width, *y), (*x + *width, *y + *height), (*x, *y + *height)];
            layer.add_line(Line {
                points: corners
                    .iter()
                    .map(|(px, py)| (Point::new(Mm(*px), Mm(*py)), false))
                    .collect(),
                is_closed: true,
            });
        }
        Element::Image { x, y, width, image } => {
            let dpi = image.width() as f32 * MM_PER_INCH / *width;
            pdf_image(image)?.add_to_layer(
                layer.clone(),
                ImageTransform {
                    translate_x: Some(Mm(*x)),
                    translate_y: Some(Mm(*y)),
                    dpi: Some(dpi),
                    ..Default::default()
                },
            );
        }
    }
    Ok(())
}

fn pdf_image(chart: &ChartImage) -> Result<Image, ReportError> {
    let raster = RgbImage::from_raw(chart.width(), chart.height(), chart.pixels().to_vec())
        .ok_or_else(|| ReportError::Image("chart raster size mismatch".to_string()))?;
    Ok(Image::from_dynamic_image(&DynamicImage::ImageRgb8(raster)))
}
