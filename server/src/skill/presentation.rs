use std::io;
use std::path::Path;

use async_std::fs;
use serde_json::{json, Value};

use super::envelope::Directive;

pub const TOKEN: &str = "wolToken";

lazy_static! {
    // Used when no document file is deployed next to the binary.
    static ref FALLBACK_DOCUMENT: Value = json!({
        "type": "APL",
        "version": "1.8",
        "mainTemplate": {
            "parameters": ["payload"],
            "items": [{
                "type": "Container",
                "height": "100vh",
                "justifyContent": "center",
                "alignItems": "center",
                "items": [
                    { "type": "Text", "text": "${payload.myData.Title}", "fontSize": "60dp" },
                    { "type": "Text", "text": "${payload.myData.Subtitle}", "fontSize": "30dp" }
                ]
            }]
        }
    });
}

/// Display document shown on screen devices after a wake.
#[derive(Debug, Clone)]
pub struct Presentation {
    document: Value,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            document: FALLBACK_DOCUMENT.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("malformed display document {path}")]
pub struct Error {
    path: String,
    #[source]
    source: serde_json::Error,
}

impl Presentation {
    pub fn new(document: Value) -> Self {
        Self { document }
    }
    /// A missing file is not fatal; a broken one is.
    pub async fn load(path: &Path) -> Result<Self, Error> {
        match fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map(Self::new)
                .map_err(|source| Error {
                    path: path.display().to_string(),
                    source,
                }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "display document {} not found, using built-in one",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(err) => {
                log::warn!(
                    "cannot read display document {}: {}, using built-in one",
                    path.display(),
                    err
                );
                Ok(Self::default())
            }
        }
    }
    pub fn render(&self, title: &str, subtitle: &str) -> Directive {
        Directive::RenderDocument {
            token: TOKEN.to_owned(),
            document: self.document.clone(),
            datasources: json!({
                "myData": {
                    "Title": title,
                    "Subtitle": subtitle,
                }
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn render_fills_datasources() {
        let Directive::RenderDocument {
            token,
            document,
            datasources,
        } = Presentation::default().render("Turned on.", "");
        assert_eq!(token, TOKEN);
        assert_eq!(document["type"], "APL");
        assert_eq!(
            datasources,
            json!({ "myData": { "Title": "Turned on.", "Subtitle": "" } })
        );
    }

    #[async_std::test]
    async fn missing_file_falls_back() {
        let presentation = Presentation::load(&PathBuf::from("./does/not/exist.json"))
            .await
            .unwrap();
        assert_eq!(presentation.document, *FALLBACK_DOCUMENT);
    }

    #[async_std::test]
    async fn bundled_document_parses() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../documents/APL_simple.json");
        let presentation = Presentation::load(&path).await.unwrap();
        assert_eq!(presentation.document["type"], "APL");
    }
}
