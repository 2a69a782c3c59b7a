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
use std::path::{Path, PathBuf};

use crate::{DriverVersion, Error, Result};

/// Service executable installed by every NVIDIA display driver package.
pub const DRIVER_EXECUTABLE: &str = r"System32\nvvsvc.exe";

/// The `FileDescription` of the executable reads
/// `NVIDIA Driver Helper Service, Version 399.07`. The version starts right
/// after this prefix; the prefix text itself is not checked, only its length.
pub const DESCRIPTION_PREFIX: &str = "NVIDIA Driver Helper Service, Version ";

pub fn driver_executable_path() -> PathBuf {
    let windows_dir = std::env::var_os("SystemRoot")
        .or_else(|| std::env::var_os("windir"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Windows"));
    windows_dir.join(DRIVER_EXECUTABLE)
}

/// Offsets count characters, not bytes.
pub fn parse_description(description: &str) -> Result<DriverVersion> {
    let offset = DESCRIPTION_PREFIX.chars().count();
    if description.chars().count() < offset {
        return Err(Error::DescriptionTooShort(description.to_string()));
    }

    let version: String = description.chars().skip(offset).collect();
    DriverVersion::from_dotted(version.trim())
}

pub fn installed_version() -> Result<DriverVersion> {
    let path = driver_executable_path();
    let description = read_file_description(&path)?;
    log::debug!("{} description: {description:?}", path.display());
    parse_description(&description)
}

#[cfg(windows)]
pub fn read_file_description(path: &Path) -> Result<String> {
    use std::{ffi::c_void, os::windows::ffi::OsStrExt, ptr};

    use windows_sys::Win32::Storage::FileSystem::{
        GetFileVersionInfoSizeW, GetFileVersionInfoW, VerQueryValueW,
    };

    fn wide(s: impl AsRef<std::ffi::OsStr>) -> Vec<u16> {
        s.as_ref().encode_wide().chain(std::iter::once(0)).collect()
    }

    fn query(block: &[u8], sub_block: &str) -> Option<(*const c_void, usize)> {
        let sub_block = wide(sub_block);
        let mut value: *mut c_void = ptr::null_mut();
        let mut len = 0u32;
        // SAFETY: `block` holds a version resource filled by GetFileVersionInfoW
        // and `sub_block` is NUL-terminated.
        let found = unsafe {
            VerQueryValueW(
                block.as_ptr().cast(),
                sub_block.as_ptr(),
                &mut value,
                &mut len,
            )
        };
        (found != 0 && !value.is_null() && len > 0).then_some((value.cast_const(), len as usize))
    }

    if !path.exists() {
        return Err(Error::DriverNotFound(path.to_path_buf()));
    }

    let version_info_error = || Error::VersionInfo {
        path: path.to_path_buf(),
        source: std::io::Error::last_os_error(),
    };

    let file_name = wide(path);
    let mut handle = 0u32;
    // SAFETY: `file_name` is NUL-terminated.
    let size = unsafe { GetFileVersionInfoSizeW(file_name.as_ptr(), &mut handle) };
    if size == 0 {
        return Err(version_info_error());
    }

    let mut block = vec![0u8; size as usize];
    // SAFETY: `block` is exactly `size` bytes long.
    let ok = unsafe {
        GetFileVersionInfoW(file_name.as_ptr(), 0, size, block.as_mut_ptr().cast())
    };
    if ok == 0 {
        return Err(version_info_error());
    }

    // First language/codepage pair, or US English / Unicode.
    let translation = query(&block, r"\VarFileInfo\Translation")
        .filter(|(_, len)| *len >= 4)
        .map(|(value, _)| {
            // SAFETY: the translation table is at least one (u16, u16) pair.
            let pair = unsafe { std::slice::from_raw_parts(value.cast::<u16>(), 2) };
            format!("{:04x}{:04x}", pair[0], pair[1])
        })
        .unwrap_or_else(|| "040904b0".to_string());

    let (value, len) = query(
        &block,
        &format!(r"\StringFileInfo\{translation}\FileDescription"),
    )
    .ok_or_else(|| Error::VersionInfo {
        path: path.to_path_buf(),
        source: std::io::Error::other("no FileDescription in version resource"),
    })?;

    // SAFETY: string values are `len` UTF-16 units, including the terminator.
    let units = unsafe { std::slice::from_raw_parts(value.cast::<u16>(), len) };
    let description = String::from_utf16_lossy(units);
    Ok(description.trim_end_matches('\0').to_string())
}

#[cfg(not(windows))]
pub fn read_file_description(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::DriverNotFound(path.to_path_buf()));
    }
    Err(Error::UnsupportedPlatform)
}
