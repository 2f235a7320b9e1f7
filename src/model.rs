use serde::{Deserialize, Serialize};

/// A game object record as exchanged with the game service.
///
/// `bitmap` travels as base64 text next to its MIME type.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitmap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitmap_content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

impl GameObject {
    /// Starting point for a record that has never been saved.
    pub fn default_value() -> Self {
        Self {
            is_enabled: Some(false),
            ..Default::default()
        }
    }

    /// Overlay every field set in `values` onto `self`.
    pub fn merge(&self, values: &GameObject) -> GameObject {
        GameObject {
            id: values.id.or(self.id),
            x: values.x.or(self.x),
            y: values.y.or(self.y),
            bitmap: values.bitmap.clone().or_else(|| self.bitmap.clone()),
            bitmap_content_type: values
                .bitmap_content_type
                .clone()
                .or_else(|| self.bitmap_content_type.clone()),
            is_enabled: values.is_enabled.or(self.is_enabled),
        }
    }

    pub fn clear_bitmap(&mut self) {
        self.bitmap = None;
        self.bitmap_content_type = None;
    }

    /// `data:` URL that opens the bitmap, when both payload and type are known.
    pub fn bitmap_data_url(&self) -> Option<String> {
        match (&self.bitmap, &self.bitmap_content_type) {
            (Some(bitmap), Some(content_type)) if !bitmap.is_empty() => {
                Some(format!("data:{content_type};base64,{bitmap}"))
            }
            _ => None,
        }
    }
}

/// Decoded size of a base64 payload, e.g. `"12 345 bytes"`.
pub fn byte_size(base64: &str) -> String {
    let padding = if base64.ends_with("==") {
        2
    } else if base64.ends_with('=') {
        1
    } else {
        0
    };
    let size = (base64.len() / 4 * 3).saturating_sub(padding);
    format!("{} bytes", group_thousands(size))
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
