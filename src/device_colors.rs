use std::collections::HashMap;
use std::sync::Mutex;

use sha1::{Digest, Sha1};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }
}

// every channel lands in [50, 255]
const MIN_CHANNEL: u32 = 50;

/// Deterministic color of a device: the same id gets the same color across
/// refreshes and sessions.
pub fn color_for(device_id: &str) -> Rgb {
    let digest = Sha1::digest(device_id.as_bytes());
    let channel = |byte: u8| (MIN_CHANNEL + byte as u32 * (256 - MIN_CHANNEL) / 256) as u8;
    Rgb {
        r: channel(digest[0]),
        g: channel(digest[1]),
        b: channel(digest[2]),
    }
}

/// Memoizes `color_for`. Purely a cache, dropping it never changes a color.
pub struct DeviceColors {
    cache: Mutex<HashMap<String, Rgb>>,
}

impl DeviceColors {
    pub fn new() -> Self {
        DeviceColors {
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, device_id: &str) -> Rgb {
        match self.cache.lock() {
            Ok(mut cache) => *cache
                .entry(device_id.to_string())
                .or_insert_with(|| color_for(device_id)),
            // a poisoned cache is still just a cache
            Err(_) => color_for(device_id),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
