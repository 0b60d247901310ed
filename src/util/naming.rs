/// This struct produces a unique name while giving a sequential
/// number to the prefix passed to `new()`.
#[derive(Debug)]
pub struct PrefixNaming {
    index: usize,
    prefix: String,
}

impl PrefixNaming {
    pub fn new(prefix: &str) -> Self {
        Self {
            index: 0,
            prefix: prefix.to_string(),
        }
    }

    pub fn next(&mut self) -> String {
        let i = self.index;
        let next = format!("{}{}", self.prefix, i);

        self.index += 1;
        next
    }

    /// Restarts numbering from zero.
    pub fn reset(&mut self) {
        self.index = 0;
    }
}
