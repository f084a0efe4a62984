// SPDX-FileCopyrightText: 2025 Phoenix R&D GmbH <hello@phnx.im>
//
// SPDX-License-Identifier: AGPL-3.0-or-later

#[derive(clap::Parser)]
pub struct Args {
    /// Directory containing the `configuration/` folder
    #[arg(long, default_value = "server/")]
    pub config_dir: String,
}
