//! Closed option sets for every styling choice.
//!
//! Each family is a sum type with one handler per variant downstream, so an unknown effect name
//! can only exist at the parsing boundary, never inside the renderer. `FromStr` (CLI flags)
//! rejects unknown names; request JSON maps them to the family's fallback variant.

use std::{fmt, str::FromStr};

use crate::foundation::error::PromoError;

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal, fallback = $fallback:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($value:literal, $label:literal), )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant, in presentation order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Variant used in place of an unknown value in request JSON.
            pub const FALLBACK: Self = Self::$fallback;

            /// Wire value (kebab-case) of this option.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Surface label shown next to the option.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = PromoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        PromoError::validation(format!(
                            "unknown {} '{s}' (expected one of: {})",
                            $what,
                            Self::ALL
                                .iter()
                                .map(|v| v.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        ))
                    })
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                Ok(raw.parse().unwrap_or_else(|_| {
                    tracing::warn!(
                        option = $what,
                        value = %raw,
                        fallback = Self::FALLBACK.as_str(),
                        "unknown option value; using fallback"
                    );
                    Self::FALLBACK
                }))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_enum! {
    /// Where the caption block is anchored and how it is aligned.
    Layout, "layout", fallback = Center {
        /// Centered horizontally and vertically.
        Center => ("center", "중앙"),
        /// Centered horizontally around 20% of the height.
        Top => ("top", "상단 강조"),
        /// Centered horizontally around 80% of the height.
        Bottom => ("bottom", "하단 집중"),
        /// Rotated about the surface center.
        Diagonal => ("diagonal", "대각선 역동"),
        /// Left-aligned, anchored to the bottom-left corner.
        Corner => ("corner", "모서리 포인트"),
    }
}

option_enum! {
    /// Caption size class, relative to the surface width.
    TextSize, "text size", fallback = Normal {
        /// `width / 12`.
        Normal => ("normal", "보통"),
        /// `width / 10`.
        Large => ("large", "크게"),
        /// `width / 8`.
        ExtraLarge => ("extra-large", "아주 크게"),
    }
}

option_enum! {
    /// Entrance animation applied to the caption during the text phase.
    TextAnimation, "text animation", fallback = None {
        /// Drawn at full opacity and size as soon as it is visible.
        None => ("none", "없음"),
        /// Grows from 80% size while fading in.
        ZoomIn => ("zoom-in", "Zoom-in"),
        /// Fades in at full size.
        FadeIn => ("fade-in", "Fade-in"),
        /// Slides up 50px into place at full opacity.
        SlideIn => ("slide-in", "Slide-in"),
    }
}

option_enum! {
    /// Motion applied to the background still.
    BackgroundEffect, "background effect", fallback = None {
        /// Scale-to-fill, static.
        None => ("none", "없음"),
        /// Slow centered zoom across the whole loop.
        KenBurns => ("ken-burns", "미세 줌 효과"),
    }
}

option_enum! {
    /// Decoration stroked around the surface edge.
    BorderEffect, "border effect", fallback = None {
        /// No border.
        None => ("none", "없음"),
        /// Pulsing white stroke with a purple glow.
        Neon => ("neon", "반짝이는 네온"),
        /// Hue cycling once per loop.
        Rainbow => ("rainbow", "무지개 그라데이션"),
        /// Dashed white stroke blinking every two frames.
        Strobe => ("strobe", "점선 스트로브"),
    }
}

impl TextSize {
    /// Divisor applied to the surface width to obtain the font size.
    pub fn width_divisor(self) -> f64 {
        match self {
            Self::Normal => 12.0,
            Self::Large => 10.0,
            Self::ExtraLarge => 8.0,
        }
    }

    /// Font size in pixels for a surface of the given width.
    pub fn font_size_px(self, surface_width: f64) -> f64 {
        surface_width / self.width_divisor()
    }
}

/// One entry of the built-in font catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontOption {
    /// Display name.
    pub name: &'static str,
    /// CSS-style family list used as the request's font identifier.
    pub family: &'static str,
}

/// Built-in font catalogue; the first entry is the default.
pub const FONTS: &[FontOption] = &[
    FontOption {
        name: "Noto Sans KR (기본)",
        family: "'Noto Sans KR', sans-serif",
    },
    FontOption {
        name: "Black Han Sans (굵은)",
        family: "'Black Han Sans', sans-serif",
    },
    FontOption {
        name: "Do Hyeon (강조)",
        family: "'Do Hyeon', sans-serif",
    },
    FontOption {
        name: "Gowun Dodum (부드러운)",
        family: "'Gowun Dodum', sans-serif",
    },
];

#[cfg(test)]
#[path = "../../tests/unit/style/options.rs"]
mod tests;
