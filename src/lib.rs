/*
* BSD 2-Clause License

* Copyright (c) 2023, Love Billenius

* Redistribution and use in source and binary forms, with or without
* modification, are permitted provided that the following conditions are met:

* 1. Redistributions of source code must retain the above copyright notice, this
*    list of conditions and the following disclaimer.

* 2. Redistributions in binary form must reproduce the above copyright notice,
*    this list of conditions and the following disclaimer in the documentation
*    and/or other materials provided with the distribution.

* THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
* AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
* IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
* DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
* FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
* DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
* SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
* CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
* OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
* OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
*/
use std::{fmt::Display, str::FromStr};

pub mod application_state;
pub mod check;
pub mod error;
pub mod internet;
pub mod local_driver;
pub mod logging;
pub mod os;
pub mod self_update;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};

/// Driver version in the vendor's canonical integer form, `416.34` is `41634`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct DriverVersion(u32);

impl DriverVersion {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Drops every dot and parses what is left. Anything other than ASCII
    /// digits and dots is rejected.
    pub fn from_dotted(s: &str) -> Result<Self> {
        let digits: String = s.chars().filter(|c| *c != '.').collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::MalformedVersion(s.to_string()));
        }

        digits
            .parse()
            .map(Self)
            .map_err(|_| Error::MalformedVersion(s.to_string()))
    }
}

impl FromStr for DriverVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_dotted(s)
    }
}

impl Display for DriverVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_version_drops_dots() {
        assert_eq!(DriverVersion::from_dotted("399.07").unwrap().get(), 39907);
        assert_eq!("416.34".parse::<DriverVersion>().unwrap().get(), 41634);
    }

    #[test]
    fn dotted_version_rejects_garbage() {
        assert!(DriverVersion::from_dotted("").is_err());
        assert!(DriverVersion::from_dotted("...").is_err());
        assert!(DriverVersion::from_dotted("399.0a").is_err());
        assert!(DriverVersion::from_dotted("-399").is_err());
    }

    #[test]
    fn versions_order_numerically() {
        assert!(DriverVersion::new(41634) > DriverVersion::new(39907));
        assert_eq!(DriverVersion::new(39907).to_string(), "39907");
    }
}
