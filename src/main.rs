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
use std::process;

use anyhow::Context;
use structopt::StructOpt;

use nvidia_update_checker::{
    application_state::{Args, Config},
    check,
    internet::Client,
    logging,
    self_update::APP_VERSION,
    ui::{self, TerminalUi, UserInterface},
};

#[tokio::main]
async fn main() {
    let args = Args::from_args();
    logging::init_logging(args.debug);
    log::debug!("{:?}", args);

    let mut ui = TerminalUi::new(args.quiet);
    ui::banner(&mut ui, APP_VERSION);

    if let Err(e) = run(&mut ui).await {
        ui.error(&format!("{:#}", e));
        ui.wait_for_key();
        process::exit(1);
    }

    ui.message("");
    ui.message("Job done! Press any key to exit.");
    ui.wait_for_key();
}

async fn run(ui: &mut TerminalUi) -> anyhow::Result<()> {
    let conf_dir = Config::dir();
    let conf = match Config::load_or_create(&conf_dir) {
        Ok((conf, created)) => {
            if created {
                ui.message("Generating configuration file, this only happens once.");
                ui.message(&format!(
                    "The configuration file is located at: {}",
                    conf_dir.display()
                ));
            }
            conf
        }
        Err(e) => {
            ui.warning(&format!(
                "Failed to read config in {}, using defaults: {}",
                conf_dir.display(),
                e
            ));
            Config::default()
        }
    };

    let client = Client::new().context("Could not create HTTP client")?;
    check::run(&conf, &client, ui)
        .await
        .context("Could not determine GPU driver status")?;
    Ok(())
}
