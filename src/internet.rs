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
use http::header;
use scraper::{Html, Selector};

use crate::{os::OsCode, DriverVersion, Error, Result};

const QUERY_ENDPOINT: &str = "http://www.nvidia.com/Download/processDriver.aspx";
const VENDOR_HOST: &str = "http://www.nvidia.com";
const PRODUCT_SERIES_ID: &str = "98";
const PRODUCT_FAMILY_ID: &str = "756";
/// English (US) in the vendor's numbering.
pub const LANGUAGE_ENGLISH: &str = "17";

const VERSION_ELEMENT_ID: &str = "tdVersion";
/// The landing page shows the version as `416.34`, followed by other text.
const VERSION_TEXT_LEN: usize = 6;
const DOWNLOAD_PATH_FRAGMENT: &str = "/content/DriverDownload-March2009/";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RemoteDriver {
    pub version: DriverVersion,
    /// `None` when the page links to no download.
    pub download_url: Option<String>,
}

pub fn query_url(os: OsCode, language: &str) -> String {
    query_url_at(QUERY_ENDPOINT, os, language)
}

fn query_url_at(endpoint: &str, os: OsCode, language: &str) -> String {
    format!(
        "{endpoint}?psid={PRODUCT_SERIES_ID}&pfid={PRODUCT_FAMILY_ID}&rpf=1&osid={os}&lid={language}&ctk=0"
    )
}

pub fn parse_landing_page(content: &str) -> Result<RemoteDriver> {
    let document = Html::parse_document(content);
    let version_selector = selector(&format!("#{VERSION_ELEMENT_ID}"))?;
    let link_selector = selector("a[href]")?;

    let version_text = document
        .select(&version_selector)
        .next()
        .ok_or(Error::VersionElementMissing(VERSION_ELEMENT_ID))?
        .text()
        .collect::<String>();
    let version_text = version_text.trim();
    let version: String = version_text.chars().take(VERSION_TEXT_LEN).collect();
    if version.chars().count() < VERSION_TEXT_LEN {
        return Err(Error::MalformedVersion(version_text.to_string()));
    }
    let version = DriverVersion::from_dotted(&version)?;

    let download_url = document
        .select(&link_selector)
        .filter_map(|element| element.value().attr("href"))
        .find(|href| href.contains(DOWNLOAD_PATH_FRAGMENT))
        .map(|href| format!("{VENDOR_HOST}{href}"));

    Ok(RemoteDriver {
        version,
        download_url,
    })
}

/// The version file holds a single decimal integer.
pub fn parse_app_version(content: &str) -> Result<u32> {
    let content = content.trim();
    content
        .parse()
        .map_err(|_| Error::MalformedVersion(content.to_string()))
}

fn selector(selectors: &str) -> Result<Selector> {
    Selector::parse(selectors).map_err(|e| Error::Selector(e.to_string()))
}

pub struct Client {
    client: reqwest::Client,
    query_endpoint: String,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::build(reqwest::Client::builder(), QUERY_ENDPOINT)
    }

    /// Talks to a local server only, bypassing any proxy from the environment.
    #[cfg(test)]
    pub(crate) fn local(query_endpoint: &str) -> Result<Self> {
        Self::build(reqwest::Client::builder().no_proxy(), query_endpoint)
    }

    fn build(builder: reqwest::ClientBuilder, query_endpoint: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );
        let client = builder.default_headers(headers).build()?;
        Ok(Self {
            client,
            query_endpoint: query_endpoint.to_string(),
        })
    }

    pub async fn get_content(&self, url: &str) -> Result<String> {
        let content = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(content)
    }

    /// The query endpoint answers with the address of the driver details page
    /// as its body.
    pub async fn get_landing_page_url(&self, os: OsCode, language: &str) -> Result<String> {
        let url = query_url_at(&self.query_endpoint, os, language);
        log::debug!("driver query: {url}");
        let landing = self.get_content(&url).await?.trim().to_string();
        if landing.is_empty() {
            return Err(Error::EmptyLandingUrl);
        }
        Ok(landing)
    }

    pub async fn get_latest_app_version(&self, url: &str) -> Result<u32> {
        let content = self.get_content(url).await?;
        parse_app_version(&content)
    }

    pub async fn get_latest_driver(&self, os: OsCode, language: &str) -> Result<RemoteDriver> {
        let landing = self.get_landing_page_url(os, language).await?;
        log::debug!("landing page: {landing}");
        let content = self.get_content(&landing).await?;
        parse_landing_page(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    const LANDING_PAGE: &str = r#"<html><body>
        <table>
          <tr><td class="contentsummaryleft">Version:</td><td id="tdVersion">416.34 &nbsp;WHQL</td></tr>
          <tr><td>Release Date:</td><td id="tdReleaseDate">2018.10.11</td></tr>
        </table>
        <a href="/Download/Find.aspx">Back</a>
        <a href="/content/DriverDownload-March2009/confirmation.php?url=/Windows/416.34/416.34-desktop-win10-64bit-international-whql.exe&lang=us&type=GeForce">Download</a>
        <a href="/content/DriverDownload-March2009/confirmation.php?url=/second.exe">Mirror</a>
      </body></html>"#;

    #[test]
    fn query_url_carries_every_parameter() {
        assert_eq!(
            query_url(OsCode::Win10x64, LANGUAGE_ENGLISH),
            "http://www.nvidia.com/Download/processDriver.aspx?psid=98&pfid=756&rpf=1&osid=57&lid=17&ctk=0"
        );
        assert!(query_url(OsCode::Legacy32, LANGUAGE_ENGLISH).contains("osid=40&"));
    }

    #[test]
    fn landing_page_version_and_first_link() {
        let driver = parse_landing_page(LANDING_PAGE).unwrap();
        assert_eq!(driver.version, DriverVersion::new(41634));
        assert_eq!(
            driver.download_url.as_deref(),
            Some("http://www.nvidia.com/content/DriverDownload-March2009/confirmation.php?url=/Windows/416.34/416.34-desktop-win10-64bit-international-whql.exe&lang=us&type=GeForce")
        );
    }

    #[test]
    fn version_text_with_trailing_space() {
        let driver = parse_landing_page(r#"<div><span id="tdVersion">416.34 </span><p>other</p></div>"#)
            .unwrap();
        assert_eq!(driver.version.get(), 41634);
    }

    #[test]
    fn missing_download_link_leaves_url_empty() {
        let driver =
            parse_landing_page(r#"<p id="tdVersion">399.07</p><a href="/elsewhere">x</a>"#).unwrap();
        assert_eq!(driver.version.get(), 39907);
        assert_eq!(driver.download_url, None);
    }

    #[test]
    fn version_window_counts_characters() {
        assert!(matches!(
            parse_landing_page(r#"<span id="tdVersion">41é.34 WHQL</span>"#),
            Err(Error::MalformedVersion(_))
        ));
        assert!(matches!(
            parse_landing_page(r#"<span id="tdVersion">4163é</span>"#),
            Err(Error::MalformedVersion(_))
        ));
    }

    #[tokio::test]
    async fn blank_query_answer_is_an_error() {
        let endpoint = serve_once("200 OK", "  \r\n").await;
        let client = Client::local(&format!("{endpoint}/Download/processDriver.aspx")).unwrap();
        assert!(matches!(
            client.get_latest_driver(OsCode::Win10x64, LANGUAGE_ENGLISH).await,
            Err(Error::EmptyLandingUrl)
        ));
    }

    #[tokio::test]
    async fn landing_url_comes_from_the_query_body() {
        let endpoint = serve_once("200 OK", "http://example.invalid/driverResults.aspx/1\n").await;
        let client = Client::local(&endpoint).unwrap();
        assert_eq!(
            client
                .get_landing_page_url(OsCode::Legacy32, LANGUAGE_ENGLISH)
                .await
                .unwrap(),
            "http://example.invalid/driverResults.aspx/1"
        );
    }

    #[tokio::test]
    async fn error_status_is_fatal() {
        let endpoint = serve_once("503 Service Unavailable", "busy").await;
        let client = Client::local(&endpoint).unwrap();
        assert!(matches!(
            client.get_latest_driver(OsCode::Win10x64, LANGUAGE_ENGLISH).await,
            Err(Error::Http(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_fatal() {
        let client = Client::local("http://127.0.0.1:1/processDriver.aspx").unwrap();
        assert!(matches!(
            client.get_latest_driver(OsCode::Win10x64, LANGUAGE_ENGLISH).await,
            Err(Error::Http(_))
        ));
    }

    #[test]
    fn app_version_file_is_a_bare_integer() {
        assert_eq!(parse_app_version("1001\n").unwrap(), 1001);
        assert!(matches!(
            parse_app_version("<html>404</html>"),
            Err(Error::MalformedVersion(_))
        ));
    }

    #[test]
    fn missing_version_element_is_an_error() {
        assert!(matches!(
            parse_landing_page("<html><body><p>maintenance</p></body></html>"),
            Err(Error::VersionElementMissing("tdVersion"))
        ));
    }

    #[test]
    fn short_or_non_numeric_version_is_an_error() {
        assert!(matches!(
            parse_landing_page(r#"<span id="tdVersion">41</span>"#),
            Err(Error::MalformedVersion(_))
        ));
        assert!(matches!(
            parse_landing_page(r#"<span id="tdVersion">beta-1 build</span>"#),
            Err(Error::MalformedVersion(_))
        ));
    }
}
