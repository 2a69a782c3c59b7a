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
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use crate::Result;

const CONFIG_DIR: &str = "TinyNvidiaUpdateChecker";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub check_for_updates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_for_updates: true,
        }
    }
}

impl Config {
    /// `<local data dir>/TinyNvidiaUpdateChecker`, next to the working
    /// directory if the platform has no such directory.
    pub fn dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(dir.join(CONFIG_FILE))?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        let mut writer = BufWriter::new(File::create(dir.join(CONFIG_FILE))?);
        serde_json::to_writer_pretty(&mut writer, &self)?;
        Ok(())
    }

    /// Returns the stored config, writing the default first if none exists.
    /// The flag tells whether the file was just created.
    pub fn load_or_create(dir: &Path) -> Result<(Self, bool)> {
        if dir.join(CONFIG_FILE).exists() {
            return Ok((Self::load(dir)?, false));
        }

        let conf = Self::default();
        conf.save(dir)?;
        Ok((conf, true))
    }
}

#[derive(Debug, StructOpt)]
#[structopt(about = "Checks whether the installed NVIDIA driver is the latest one")]
pub struct Args {
    /// No banner, no progress and no waiting for a key press
    #[structopt(short = "q", long = "quiet")]
    pub quiet: bool,

    /// Print intermediate values such as OS code and versions
    #[structopt(short = "d", long = "debug")]
    pub debug: bool,
}
