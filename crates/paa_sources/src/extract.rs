use paa_core::{Error, Result};
use scraper::{Html, Selector};

/// Elements whose text is worth handing to the model.
const CONTENT_SELECTOR: &str = "h1, h2, h3, h4, p, li, td, th, address";

fn clean(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pulls readable text out of a web page, one block per line.
///
/// Text inside `<li>` or `<td>` that contains a `<p>` shows up twice; that is
/// harmless for a prompt and keeps the walk simple.
pub fn extract_page_text(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(CONTENT_SELECTOR)
        .map_err(|e| Error::Source(format!("Invalid selector: {}", e)))?;

    let blocks: Vec<String> = document
        .select(&selector)
        .map(|el| clean(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect();

    if blocks.is_empty() {
        return Err(Error::Source("No readable text found in page".to_string()));
    }
    Ok(blocks.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_page_text() {
        let html = r#"
            <html><head><title>Ignored</title><script>var x = 1;</script></head>
            <body>
              <nav><a href="/">Home</a></nav>
              <h1>Dentists in   Arica</h1>
              <p>Clinic <strong>Sonrisa</strong> opens at 9.</p>
              <ul><li>Phone: 555-1234</li></ul>
              <table><tr><th>Name</th><td>Sonrisa</td></tr></table>
            </body></html>
        "#;
        let text = extract_page_text(html).unwrap();
        assert_eq!(
            text,
            "Dentists in Arica\nClinic Sonrisa opens at 9.\nPhone: 555-1234\nName\nSonrisa"
        );
    }

    #[test]
    fn test_page_without_text() {
        let err = extract_page_text("<html><body><div></div></body></html>").unwrap_err();
        assert!(matches!(err, Error::Source(_)));
    }
}
