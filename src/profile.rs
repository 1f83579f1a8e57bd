//! Player profile: best score and cosmetic selections
//!
//! Persisted to LocalStorage on wasm. Everything read back from storage is
//! untrusted: the name is length-capped and whitespace-normalized, the
//! design and color tags fall back to defaults when they name nothing, and
//! the best score only ever moves up.

use serde::{Deserialize, Serialize};

/// Maximum persisted name length in characters
pub const NAME_MAX_LEN: usize = 16;

/// Cosmetic chicken design tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChickenDesign {
    #[default]
    Classic,
    Fluffy,
    Punk,
}

impl ChickenDesign {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChickenDesign::Classic => "classic",
            ChickenDesign::Fluffy => "fluffy",
            ChickenDesign::Punk => "punk",
        }
    }

    /// Parse a persisted tag; anything unknown falls back to `Classic`
    pub fn from_tag(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "classic" => ChickenDesign::Classic,
            "fluffy" => ChickenDesign::Fluffy,
            "punk" => ChickenDesign::Punk,
            _ => ChickenDesign::default(),
        }
    }
}

/// Cosmetic plumage color tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChickenColor {
    #[default]
    White,
    Brown,
    Black,
    Gold,
}

impl ChickenColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChickenColor::White => "white",
            ChickenColor::Brown => "brown",
            ChickenColor::Black => "black",
            ChickenColor::Gold => "gold",
        }
    }

    /// Parse a persisted tag; anything unknown falls back to `White`
    pub fn from_tag(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "white" => ChickenColor::White,
            "brown" => ChickenColor::Brown,
            "black" => ChickenColor::Black,
            "gold" => ChickenColor::Gold,
            _ => ChickenColor::default(),
        }
    }
}

/// Trim, collapse inner whitespace runs, and cap the length
pub fn normalize_name(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(NAME_MAX_LEN).collect()
}

/// On-disk shape. Tags stay as free strings so stale or hand-edited values
/// degrade to defaults instead of failing the whole parse.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct RawProfile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    design: String,
    #[serde(default)]
    color: String,
    #[serde(default)]
    best_score: f64,
}

/// Validated player profile
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub design: ChickenDesign,
    pub color: ChickenColor,
    pub best_score: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            design: ChickenDesign::default(),
            color: ChickenColor::default(),
            best_score: 0.0,
        }
    }
}

impl Profile {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "cluck_dash_profile";

    fn from_raw(raw: RawProfile) -> Self {
        Self {
            name: normalize_name(&raw.name),
            design: ChickenDesign::from_tag(&raw.design),
            color: ChickenColor::from_tag(&raw.color),
            best_score: if raw.best_score.is_finite() && raw.best_score > 0.0 {
                raw.best_score
            } else {
                0.0
            },
        }
    }

    fn to_raw(&self) -> RawProfile {
        RawProfile {
            name: self.name.clone(),
            design: self.design.as_str().to_string(),
            color: self.color.as_str().to_string(),
            best_score: self.best_score,
        }
    }

    pub fn set_name(&mut self, raw: &str) {
        self.name = normalize_name(raw);
    }

    /// Fold a finished run into the best score. Returns true if it improved.
    pub fn record_score(&mut self, score: f64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            return true;
        }
        false
    }

    /// Load the profile from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<RawProfile>(&json) {
                    Ok(raw) => {
                        log::info!("Loaded profile from LocalStorage");
                        return Self::from_raw(raw);
                    }
                    Err(e) => log::warn!("Corrupt profile, using defaults: {e}"),
                }
            }
        }

        log::info!("Using default profile");
        Self::default()
    }

    /// Save the profile to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(&self.to_raw()) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Profile saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
