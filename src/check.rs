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
use crate::{
    application_state::Config,
    internet::{Client, RemoteDriver, LANGUAGE_ENGLISH},
    local_driver, os,
    self_update::{self, SelfUpdate},
    ui::UserInterface,
    DriverVersion, Result,
};

const UP_TO_DATE: &str = "GPU drivers are up-to-date!";
const LOCAL_NEWER: &str = "Current GPU driver is newer than remote!";
const UPDATE_AVAILABLE: &str = "There are new drivers to download!";
const DOWNLOAD_QUESTION: &str =
    "There's a new update available to download, do you want to download the update now?";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Verdict {
    UpToDate,
    LocalNewer,
    UpdateAvailable,
}

impl Verdict {
    pub fn from_versions(local: DriverVersion, remote: DriverVersion) -> Self {
        use std::cmp::Ordering;

        match remote.cmp(&local) {
            Ordering::Equal => Verdict::UpToDate,
            Ordering::Less => Verdict::LocalNewer,
            Ordering::Greater => Verdict::UpdateAvailable,
        }
    }

    /// A newer local driver is reported as newer and then as up to date.
    pub fn messages(self) -> &'static [&'static str] {
        match self {
            Verdict::UpToDate => &[UP_TO_DATE],
            Verdict::LocalNewer => &[LOCAL_NEWER, UP_TO_DATE],
            Verdict::UpdateAvailable => &[UPDATE_AVAILABLE],
        }
    }
}

/// Prints the verdict and, for a newer remote driver, offers the download.
pub fn report(
    local: DriverVersion,
    remote: &RemoteDriver,
    ui: &mut dyn UserInterface,
) -> Result<Verdict> {
    let verdict = Verdict::from_versions(local, remote.version);
    for msg in verdict.messages() {
        ui.message(msg);
    }

    if verdict == Verdict::UpdateAvailable {
        match remote.download_url.as_deref() {
            Some(url) => {
                if ui.confirm(DOWNLOAD_QUESTION)? {
                    if let Err(e) = ui.open_url(url) {
                        ui.warning(&format!("Could not open {url}: {e}"));
                    }
                }
            }
            None => ui.warning("No download link was found on the driver page."),
        }
    }

    log::debug!("local driver version: {local}");
    log::debug!("remote driver version: {}", remote.version);
    Ok(verdict)
}

/// Runs the self-update check unless the config turns it off.
pub async fn check_self_update(
    config: &Config,
    client: &Client,
    version_url: &str,
    ui: &mut dyn UserInterface,
) -> Option<SelfUpdate> {
    if !config.check_for_updates {
        log::debug!("self-update check disabled");
        return None;
    }
    self_update::check(client, version_url, ui).await
}

/// One full pass: self-update, OS, local driver, remote driver, verdict.
pub async fn run(config: &Config, client: &Client, ui: &mut dyn UserInterface) -> Result<Verdict> {
    check_self_update(config, client, self_update::VERSION_URL, ui).await;

    let target = os::detect()?;
    log::debug!("Windows {}, OS code {}", target.label, target.code);

    let spinner = ui.spinner("Looking up GPU information . . .");
    let lookup = async {
        let local = local_driver::installed_version()?;
        let remote = client
            .get_latest_driver(target.code, LANGUAGE_ENGLISH)
            .await?;
        Ok::<_, crate::Error>((local, remote))
    }
    .await;
    spinner.finish_and_clear();
    let (local, remote) = lookup?;

    report(local, &remote, ui)
}
