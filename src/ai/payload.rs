use base64ct::{Base64, Encoding};

/// `data:<mime>;base64,<payload>` as sent to the analysis capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime_type: String,
    pub data: String,
}

impl DataUri {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            data: Base64::encode_string(bytes),
        }
    }

    /// Typed entries travel the same road as photos: the prompt is base64
    /// encoded under a `text/plain` mime type.
    pub fn from_description(description: &str) -> Self {
        let prompt = format!(
            "The user ate the following and typed it in instead of taking a photo: {}",
            description.trim()
        );
        Self::from_bytes("text/plain", prompt.as_bytes())
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    #[cfg(test)]
    pub fn decode(&self) -> Option<Vec<u8>> {
        Base64::decode_vec(&self.data).ok()
    }
}

impl std::fmt::Display for DataUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

#[cfg(test)]
mod payload_tests {
    use super::*;

    #[test]
    fn image_bytes_become_a_data_uri() {
        let uri = DataUri::from_bytes("image/png", b"\x89PNG");
        assert!(uri.is_image());
        assert_eq!(uri.to_string(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn description_is_wrapped_and_encoded_as_text() {
        let uri = DataUri::from_description("  two boiled eggs ");
        assert_eq!(uri.mime_type, "text/plain");
        assert!(!uri.is_image());
        let text = String::from_utf8(uri.decode().unwrap()).unwrap();
        assert!(text.ends_with("two boiled eggs"));
    }
}
