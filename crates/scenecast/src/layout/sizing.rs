//! Node sizing from label text.

use scenecast_core::geometry::{Insets, Size};

use crate::config::LayoutConfig;

/// Computes node box sizes from label length.
///
/// Labels are wrapped greedily at word boundaries to fit `max_width`; words
/// longer than a line are broken. The resulting text block is padded and
/// clamped to the configured minimum and maximum sizes.
#[derive(Debug, Clone)]
pub struct NodeSizer {
    char_width: f32,
    line_height: f32,
    padding: f32,
    min_width: f32,
    max_width: f32,
    min_height: f32,
}

impl NodeSizer {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            char_width: config.char_width,
            line_height: config.line_height,
            padding: config.padding,
            min_width: config.min_width,
            max_width: config.max_width.max(config.min_width),
            min_height: config.min_height,
        }
    }

    /// Characters that fit on one line.
    fn line_capacity(&self) -> usize {
        let usable = self.max_width - 2.0 * self.padding;
        ((usable / self.char_width).floor() as usize).max(1)
    }

    /// Splits `label` into lines of at most [`Self::line_capacity`] characters.
    pub fn wrap(&self, label: &str) -> Vec<String> {
        let capacity = self.line_capacity();
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in label.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > capacity {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(capacity);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word.len() > capacity {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Returns the box size for `label`; always positive.
    pub fn size(&self, label: &str) -> Size {
        let lines = self.wrap(label);
        let longest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        let text = Size::new(
            longest as f32 * self.char_width,
            lines.len() as f32 * self.line_height,
        );
        let padded = text.add_padding(Insets::uniform(self.padding));

        Size::new(
            padded.width().clamp(self.min_width, self.max_width),
            padded.height().max(self.min_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    fn sizer() -> NodeSizer {
        NodeSizer::new(&LayoutConfig::default())
    }

    #[test]
    fn test_short_label_uses_minimum_size() {
        let size = sizer().size("A");
        assert!(approx_eq!(f32, size.width(), 80.0));
        assert!(approx_eq!(f32, size.height(), 42.0));
    }

    #[test]
    fn test_empty_label_is_positive() {
        let size = sizer().size("");
        assert!(size.is_positive());
        assert_eq!(sizer().wrap(""), vec![String::new()]);
    }

    #[test]
    fn test_width_grows_with_label() {
        // 12 chars * 8 + 24 padding
        let size = sizer().size("Option Alpha");
        assert!(approx_eq!(f32, size.width(), 120.0));
    }

    #[test]
    fn test_long_label_wraps() {
        // 196px usable at 8px per char
        let sizer = sizer();
        let lines = sizer.wrap("Quarterly revenue review with the regional sales leadership team");
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|line| line.chars().count() <= 24));

        let size = sizer.size("Quarterly revenue review with the regional sales leadership team");
        assert!(approx_eq!(f32, size.width(), 216.0));
        assert!(size.height() >= lines.len() as f32 * 18.0);
    }

    #[test]
    fn test_long_word_is_broken() {
        let lines = sizer().wrap("Supercalifragilisticexpialidocious");
        assert_eq!(lines, vec!["Supercalifragilisticexpi", "alidocious"]);
    }
}
