//! Named social media output sizes.

/// A named output size for a social media platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub platform: &'static str,
    pub width: u32,
    pub height: u32,
    pub aspect_label: &'static str,
}

impl Preset {
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

pub static PRESETS: [Preset; 4] = [
    Preset {
        id: "ig-post",
        name: "Instagram Post",
        platform: "instagram",
        width: 1080,
        height: 1080,
        aspect_label: "1:1",
    },
    Preset {
        id: "li-banner",
        name: "LinkedIn Banner",
        platform: "linkedin",
        width: 1584,
        height: 396,
        aspect_label: "4:1",
    },
    Preset {
        id: "tw-header",
        name: "Twitter Header",
        platform: "twitter",
        width: 1500,
        height: 500,
        aspect_label: "3:1",
    },
    Preset {
        id: "yt-thumb",
        name: "YouTube Thumbnail",
        platform: "youtube",
        width: 1280,
        height: 720,
        aspect_label: "16:9",
    },
];

pub fn find(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|preset| preset.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        assert_eq!(find("tw-header").map(|p| p.width), Some(1500));
        assert!(find("tiktok").is_none());
    }

    #[test]
    fn labels_match_dimensions() {
        for preset in &PRESETS {
            let (w, h) = preset.aspect_label.split_once(':').unwrap();
            let label: f32 = w.parse::<f32>().unwrap() / h.parse::<f32>().unwrap();
            assert!((label - preset.aspect()).abs() < 1e-2, "{}", preset.id);
        }
    }
}
