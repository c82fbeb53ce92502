//! yt-dlp argument lists built from [`EngineOptions`].

use std::ffi::OsString;

use super::progress_line::progress_template;
use super::EngineOptions;

impl EngineOptions {
    /// Arguments shared by probe and retrieval: format, egress and cookies.
    fn common_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            self.format.as_str().into(),
            "--no-warnings".into(),
            "--no-color".into(),
        ];
        if let Some(proxy) = &self.proxy {
            args.push("--proxy".into());
            args.push(proxy.into());
        }
        if let Some(browser) = &self.cookies_from_browser {
            args.push("--cookies-from-browser".into());
            args.push(browser.into());
        } else if let Some(path) = &self.cookie_file {
            args.push("--cookies".into());
            args.push(path.into());
        }
        args
    }

    /// Arguments for the metadata-only probe of `url`.
    pub fn probe_args(&self, url: &str) -> Vec<OsString> {
        let mut args = self.common_args();
        args.push("--dump-single-json".into());
        args.push("--skip-download".into());
        args.push("--".into());
        args.push(url.into());
        args
    }

    /// Arguments for the full retrieval of `url`.
    pub fn retrieve_args(&self, url: &str) -> Vec<OsString> {
        let mut args = self.common_args();
        args.push("-o".into());
        args.push(self.output_template.clone().into_os_string());
        args.push("--merge-output-format".into());
        args.push(self.container.as_str().into());
        args.push("--remux-video".into());
        args.push(self.container.as_str().into());
        args.push("--newline".into());
        args.push("--progress-template".into());
        args.push(progress_template().into());
        args.push("--".into());
        args.push(url.into());
        args
    }
}
