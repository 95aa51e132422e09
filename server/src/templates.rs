//! HTML pages
//!
//! Templates are compiled into the binary. A fresh `TinyTemplate` is built
//! for each render; values are HTML-escaped by the default formatter.

use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::error::ApiError;

static HEADER_HTML: &str = include_str!("../templates/header.html");
static FOOTER_HTML: &str = include_str!("../templates/footer.html");

static INDEX_HTML: &str = include_str!("../templates/index.html");
static CROP_HTML: &str = include_str!("../templates/crop.html");
static FERTILIZER_HTML: &str = include_str!("../templates/fertilizer.html");
static BLOCK_INDEX_HTML: &str = include_str!("../templates/block_index.html");
static REGISTER_HTML: &str = include_str!("../templates/register.html");

static DISEASE_RESULT_HTML: &str = include_str!("../templates/disease_result.html");
static CROP_RESULT_HTML: &str = include_str!("../templates/crop_result.html");
static FERTILIZER_RESULT_HTML: &str = include_str!("../templates/fertilizer_result.html");
static SUCCESS_HTML: &str = include_str!("../templates/success.html");

/// Static pages served by GET handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Crop,
    Fertilizer,
    BlockIndex,
    Register,
}

impl Page {
    fn source(self) -> &'static str {
        match self {
            Page::Index => INDEX_HTML,
            Page::Crop => CROP_HTML,
            Page::Fertilizer => FERTILIZER_HTML,
            Page::BlockIndex => BLOCK_INDEX_HTML,
            Page::Register => REGISTER_HTML,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Index => "Plant Disease Detection",
            Page::Crop => "Crop Recommendation",
            Page::Fertilizer => "Fertilizer Recommendation",
            Page::BlockIndex => "Services",
            Page::Register => "Farmer Registration",
        }
    }
}

/// Values the header and footer partials read
#[derive(Serialize)]
struct PageMeta {
    title: &'static str,
}

/// Page body values nested beside the shared `page` metadata
#[derive(Serialize)]
struct Layout<'a, C> {
    page: PageMeta,
    #[serde(flatten)]
    content: &'a C,
}

#[derive(Serialize)]
struct NoContent {}

#[derive(Serialize)]
pub struct DiseaseResultContext {
    pub prediction: String,
    pub plant: &'static str,
    pub healthy: bool,
}

#[derive(Serialize)]
pub struct CropResultContext {
    pub crop: &'static str,
}

#[derive(Serialize)]
pub struct FertilizerResultContext {
    pub fertilizer: &'static str,
}

#[derive(Serialize)]
pub struct MessageContext {
    pub message: &'static str,
}

fn render<C: Serialize>(
    source: &'static str,
    title: &'static str,
    ctx: &C,
) -> Result<String, ApiError> {
    let mut tt = TinyTemplate::new();
    tt.add_template("header", HEADER_HTML)?;
    tt.add_template("footer", FOOTER_HTML)?;
    tt.add_template("page", source)?;

    let layout = Layout {
        page: PageMeta { title },
        content: ctx,
    };
    Ok(tt.render("page", &layout)?)
}

pub fn render_page(page: Page) -> Result<String, ApiError> {
    render(page.source(), page.title(), &NoContent {})
}

pub fn render_disease_result(ctx: &DiseaseResultContext) -> Result<String, ApiError> {
    render(DISEASE_RESULT_HTML, "Diagnosis", ctx)
}

pub fn render_crop_result(ctx: &CropResultContext) -> Result<String, ApiError> {
    render(CROP_RESULT_HTML, Page::Crop.title(), ctx)
}

pub fn render_fertilizer_result(ctx: &FertilizerResultContext) -> Result<String, ApiError> {
    render(FERTILIZER_RESULT_HTML, Page::Fertilizer.title(), ctx)
}

pub fn render_success(ctx: &MessageContext) -> Result<String, ApiError> {
    render(SUCCESS_HTML, "Registration Complete", ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_static_page_renders() {
        for page in [
            Page::Index,
            Page::Crop,
            Page::Fertilizer,
            Page::BlockIndex,
            Page::Register,
        ] {
            let html = render_page(page).unwrap();
            assert!(html.contains("<html"), "{:?}", page);
            assert!(
                html.contains(&format!("<title>{} | Agri Assist</title>", page.title())),
                "{:?}",
                page
            );
            assert!(html.contains(&format!("<h2>{}</h2>", page.title())), "{:?}", page);
            assert!(html.contains("</html>"), "{:?}", page);
        }
    }

    #[test]
    fn test_result_values_are_escaped() {
        let html = render_success(&MessageContext {
            message: "<b>done</b>",
        })
        .unwrap();
        assert!(html.contains("&lt;b&gt;done&lt;/b&gt;"));
        assert!(!html.contains("<b>done</b>"));
    }

    #[test]
    fn test_disease_result_shows_label() {
        let html = render_disease_result(&DiseaseResultContext {
            prediction: "Tomato_Leaf_Mold".to_string(),
            plant: "Tomato",
            healthy: false,
        })
        .unwrap();
        assert!(html.contains("<strong>Tomato_Leaf_Mold</strong>"));
        assert!(html.contains("<title>Diagnosis | Agri Assist</title>"));
        assert!(html.contains("Signs of disease detected."));
    }

    #[test]
    fn test_header_and_footer_wrap_every_result_page() {
        let pages = [
            render_crop_result(&CropResultContext { crop: "Wheat, Maize" }).unwrap(),
            render_fertilizer_result(&FertilizerResultContext { fertilizer: "NPK" }).unwrap(),
            render_success(&MessageContext { message: "ok" }).unwrap(),
        ];
        for html in &pages {
            assert!(html.starts_with("<!DOCTYPE html>"), "{}", html);
            assert!(html.contains("<nav>"), "{}", html);
            assert!(html.trim_end().ends_with("</html>"), "{}", html);
        }
        assert!(pages[0].contains("<title>Crop Recommendation | Agri Assist</title>"));
    }

    #[test]
    fn test_forms_post_to_their_handlers() {
        assert!(render_page(Page::Index).unwrap().contains(r#"action="/predict""#));
        assert!(render_page(Page::Crop).unwrap().contains(r#"action="/crop-result""#));
        assert!(render_page(Page::Fertilizer)
            .unwrap()
            .contains(r#"action="/fertilizer-result""#));
        assert!(render_page(Page::Register)
            .unwrap()
            .contains(r#"action="/register-farmer""#));
    }
}
