//! Parameter accumulation for CSI and DCS headers.
//!
//! Parameters are decimal numbers separated by semicolons. An empty
//! parameter is recorded as 0. Both the count and the magnitude are
//! bounded so hostile input cannot grow memory.

/// Maximum number of parameters kept per sequence; extras are dropped
pub const MAX_PARAMS: usize = 16;

/// Largest value a single parameter can hold; larger values saturate
pub const MAX_PARAM_VALUE: u16 = u16::MAX;

/// Maximum number of intermediate bytes before a sequence is ignored
pub const MAX_INTERMEDIATES: usize = 2;

#[derive(Debug, Clone, Default)]
pub struct ParamsBuilder {
    params: Vec<u16>,
    current: u32,
    has_digit: bool,
    started: bool,
}

impl ParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: Vec::with_capacity(MAX_PARAMS),
            current: 0,
            has_digit: false,
            started: false,
        }
    }

    pub fn clear(&mut self) {
        self.params.clear();
        self.current = 0;
        self.has_digit = false;
        self.started = false;
    }

    pub fn push_digit(&mut self, byte: u8) {
        let digit = u32::from(byte - b'0');
        self.current = (self.current * 10 + digit).min(u32::from(MAX_PARAM_VALUE));
        self.has_digit = true;
        self.started = true;
    }

    /// Close the current parameter at a `;` boundary
    pub fn separator(&mut self) {
        self.commit();
        self.started = true;
    }

    /// Finish accumulation and hand back the parameter list.
    ///
    /// A trailing parameter is only recorded if a digit or separator was seen,
    /// so `CSI H` yields no parameters while `CSI ; H` yields `[0, 0]`.
    pub fn finish(&mut self) -> Vec<u16> {
        if self.has_digit || self.started {
            self.commit();
        }
        let params = std::mem::take(&mut self.params);
        self.clear();
        params
    }

    fn commit(&mut self) {
        if self.params.len() < MAX_PARAMS {
            // Bounded by MAX_PARAM_VALUE above
            self.params.push(self.current as u16);
        }
        self.current = 0;
        self.has_digit = false;
    }
}
