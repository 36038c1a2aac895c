use crc32fast::Hasher;

/// Generate a stable page seed from a page identifier using CRC32
pub fn get_page_seed(page_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(page_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for nodes within a page document
///
/// Every generated id embeds the page seed, so ids are unique across pages
/// and deterministic within one (same page, same creation order, same ids).
#[derive(Clone, Debug)]
pub struct IdGenerator {
    seed: String, // Page seed (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(page_id: &str) -> Self {
        Self {
            seed: get_page_seed(page_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next id for the given node kind, e.g. `widget-a1b2c3-4`
    pub fn next(&mut self, kind: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", kind, self.seed, self.count)
    }

    /// Get the page seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Fast-forward the counter past ids already present in loaded content
    pub fn advance_past(&mut self, count: u32) {
        if count > self.count {
            self.count = count;
        }
    }
}
