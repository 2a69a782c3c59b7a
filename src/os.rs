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
use std::fmt::Display;

use crate::{Error, Result};

/// Vendor OS identifiers accepted by the driver query endpoint.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum OsCode {
    /// Vista, 7, 8 and 8.1, 32-bit.
    Legacy32,
    /// Vista, 7, 8 and 8.1, 64-bit.
    Legacy64,
    Win10x32,
    Win10x64,
}

impl OsCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            OsCode::Legacy32 => "40",
            OsCode::Legacy64 => "41",
            OsCode::Win10x32 => "56",
            OsCode::Win10x64 => "57",
        }
    }
}

impl Display for OsCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct OsTarget {
    pub label: &'static str,
    pub code: OsCode,
}

struct Release {
    needle: &'static str,
    label: &'static str,
    x86: OsCode,
    x64: OsCode,
}

// Searched top to bottom, the first needle found in the version string wins.
const RELEASES: &[Release] = &[
    Release {
        needle: "10.0",
        label: "10",
        x86: OsCode::Win10x32,
        x64: OsCode::Win10x64,
    },
    Release {
        needle: "6.3",
        label: "8.1",
        x86: OsCode::Legacy32,
        x64: OsCode::Legacy64,
    },
    Release {
        needle: "6.2",
        label: "8",
        x86: OsCode::Legacy32,
        x64: OsCode::Legacy64,
    },
    Release {
        needle: "6.1",
        label: "7",
        x86: OsCode::Legacy32,
        x64: OsCode::Legacy64,
    },
    Release {
        needle: "6.0",
        label: "Vista",
        x86: OsCode::Legacy32,
        x64: OsCode::Legacy64,
    },
];

pub fn resolve(version: &str, is_64bit: bool) -> Result<OsTarget> {
    let release = RELEASES
        .iter()
        .find(|release| version.contains(release.needle))
        .ok_or_else(|| Error::UnsupportedOs(version.to_string()))?;

    Ok(OsTarget {
        label: release.label,
        code: if is_64bit { release.x64 } else { release.x86 },
    })
}

/// Resolves the machine we are running on.
pub fn detect() -> Result<OsTarget> {
    let version = host_os_version()?;
    let is_64bit = host_is_64bit();
    log::debug!("host OS version {version}, 64-bit: {is_64bit}");
    resolve(&version, is_64bit)
}

/// `major.minor.build` as reported by the kernel, which unlike
/// `GetVersionEx` is not subject to manifest-based version lies.
#[cfg(windows)]
pub fn host_os_version() -> Result<String> {
    use windows_sys::{
        Wdk::System::SystemServices::RtlGetVersion,
        Win32::System::SystemInformation::OSVERSIONINFOW,
    };

    // SAFETY: OSVERSIONINFOW is plain data, all-zero is a valid value.
    let mut info: OSVERSIONINFOW = unsafe { std::mem::zeroed() };
    info.dwOSVersionInfoSize = std::mem::size_of::<OSVERSIONINFOW>() as u32;

    // SAFETY: `info` is a properly sized, writable OSVERSIONINFOW.
    let status = unsafe { RtlGetVersion(&mut info) };
    if status != 0 {
        return Err(Error::Io(std::io::Error::other(format!(
            "RtlGetVersion failed with status {status:#x}"
        ))));
    }

    Ok(format!(
        "{}.{}.{}",
        info.dwMajorVersion, info.dwMinorVersion, info.dwBuildNumber
    ))
}

#[cfg(not(windows))]
pub fn host_os_version() -> Result<String> {
    Err(Error::UnsupportedPlatform)
}

pub fn host_is_64bit() -> bool {
    // A 32-bit process on 64-bit Windows sees PROCESSOR_ARCHITEW6432.
    cfg!(target_pointer_width = "64") || std::env::var_os("PROCESSOR_ARCHITEW6432").is_some()
}
