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
use crate::{internet::Client, ui::UserInterface};

/// Bumped by hand on every release, compared against [`VERSION_URL`].
pub const APP_VERSION: u32 = 1000;

pub const VERSION_URL: &str =
    "https://raw.githubusercontent.com/ElPumpo/TinyNvidiaUpdateChecker/master/TinyNvidiaUpdateChecker/version";
pub const RELEASES_URL: &str = "https://github.com/ElPumpo/TinyNvidiaUpdateChecker/releases";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SelfUpdate {
    UpToDate,
    Available(u32),
}

pub fn is_newer(remote: u32, local: u32) -> bool {
    remote > local
}

/// Tells the user about a newer release and opens the releases page.
pub fn notify_if_newer(remote: u32, ui: &mut dyn UserInterface) -> SelfUpdate {
    log::debug!("local app version {APP_VERSION}, remote app version {remote}");
    if !is_newer(remote, APP_VERSION) {
        return SelfUpdate::UpToDate;
    }

    ui.message("There is an update available for TinyNvidiaUpdateChecker!");
    ui.message("Please visit the official GitHub page and download the latest version.");
    if let Err(e) = ui.open_url(RELEASES_URL) {
        ui.warning(&format!("Could not open {RELEASES_URL}: {e}"));
    }
    SelfUpdate::Available(remote)
}

/// Best effort: a failed lookup of `version_url` is reported and `None`
/// returned.
pub async fn check(
    client: &Client,
    version_url: &str,
    ui: &mut dyn UserInterface,
) -> Option<SelfUpdate> {
    let spinner = ui.spinner("Searching for updates . . .");
    let fetched = client.get_latest_app_version(version_url).await;
    spinner.finish_and_clear();

    match fetched {
        Ok(remote) => Some(notify_if_newer(remote, ui)),
        Err(e) => {
            log::debug!("self-update lookup failed: {e:?}");
            ui.warning(&format!("Could not search for updates! {e}"));
            None
        }
    }
}
