//! Session backed by the CF CLI
//!
//! The targeted organization comes from the CF CLI configuration file. Its
//! domains come from the Cloud Controller v3 API through `cf curl`, so token
//! refresh and API endpoint selection stay the CF CLI's business.

use crate::{
    config::CfConfig,
    core::session::{Domain, Organization, OrganizationDetails, Session},
    error::SessionError,
    utils::{cf_config_path, process::ProcessRunner, resolve_cf_home},
};
use reqwest::Url;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, instrument, warn};

/// Upper bound on followed `pagination.next` links
const MAX_DOMAIN_PAGES: usize = 100;

/// Origin used only to build and split API paths
const API_ORIGIN: &str = "https://api.invalid";

/// Subset of `~/.cf/config.json` we read
#[derive(Debug, Default, Deserialize)]
struct CfConfigFile {
    #[serde(rename = "AccessToken", default)]
    access_token: String,
    #[serde(rename = "Target", default)]
    target: String,
    #[serde(rename = "OrganizationFields", default)]
    organization_fields: OrganizationFields,
}

#[derive(Debug, Default, Deserialize)]
struct OrganizationFields {
    #[serde(rename = "GUID", default)]
    guid: String,
    #[serde(rename = "Name", default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    title: String,
    #[serde(default)]
    detail: String,
}

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    #[serde(default)]
    next: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

#[derive(Debug, Deserialize)]
struct OrganizationResource {
    guid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DomainResource {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OrganizationPage {
    #[serde(default)]
    resources: Vec<OrganizationResource>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
struct DomainPage {
    #[serde(default)]
    resources: Vec<DomainResource>,
    #[serde(default)]
    pagination: Pagination,
    #[serde(default)]
    errors: Vec<ApiError>,
}

/// [`Session`] implementation that asks the installed CF CLI
#[derive(Debug)]
pub struct CfCliSession {
    binary: String,
    home: Option<PathBuf>,
    process_runner: ProcessRunner,
}

impl CfCliSession {
    /// Create a session reader from CF configuration
    #[must_use]
    pub fn new(config: &CfConfig, debug: bool) -> Self {
        Self {
            binary: config.binary.clone(),
            home: config.home.clone(),
            process_runner: ProcessRunner::new(debug),
        }
    }

    fn config_path(&self) -> Result<PathBuf, SessionError> {
        resolve_cf_home(self.home.as_deref())
            .map(|home| cf_config_path(&home))
            .ok_or_else(|| SessionError::ConfigNotFound {
                path: PathBuf::from("~").join(".cf").join("config.json"),
                source: None,
            })
    }

    fn read_config(&self) -> Result<CfConfigFile, SessionError> {
        let path = self.config_path()?;
        debug!("Reading CF configuration from {}", path.display());

        let content = fs::read_to_string(&path).map_err(|e| SessionError::ConfigNotFound {
            path: path.clone(),
            source: Some(e),
        })?;

        serde_json::from_str(&content).map_err(|source| SessionError::ConfigParse { path, source })
    }

    /// Run `cf curl <path>` and return its stdout
    fn curl(&self, path: &str) -> Result<String, SessionError> {
        let result = self
            .process_runner
            .run_command_with_output(&self.binary, &["curl", path])?;
        if !result.stderr.trim().is_empty() {
            debug!("cf curl {} stderr: {}", path, result.stderr.trim());
        }
        Ok(result.stdout)
    }

    fn find_organization(&self, name: &str) -> Result<OrganizationResource, SessionError> {
        let path = build_path("/v3/organizations", &[("names", name)])?;
        let body = self.curl(&path)?;
        let page: OrganizationPage = decode_page(&path, &body)?;
        check_api_errors(&path, &page.errors)?;

        page.resources
            .into_iter()
            .find(|org| org.name == name)
            .ok_or_else(|| SessionError::OrgNotFound {
                name: name.to_string(),
            })
    }

    fn list_domains(&self, org_guid: &str) -> Result<Vec<Domain>, SessionError> {
        let mut domains = Vec::new();
        let mut next = Some(format!("/v3/organizations/{org_guid}/domains"));
        let mut pages = 0;

        while let Some(path) = next.take() {
            pages += 1;
            if pages > MAX_DOMAIN_PAGES {
                warn!("Stopped following domain pages after {}", MAX_DOMAIN_PAGES);
                break;
            }

            let body = self.curl(&path)?;
            let page: DomainPage = decode_page(&path, &body)?;
            check_api_errors(&path, &page.errors)?;

            domains.extend(
                page.resources
                    .into_iter()
                    .map(|resource| Domain {
                        name: resource.name,
                    }),
            );

            next = match page.pagination.next {
                Some(link) => Some(path_of(&link.href)?),
                None => None,
            };
        }

        debug!("Found {} domain(s) for organization {}", domains.len(), org_guid);
        Ok(domains)
    }
}

impl Session for CfCliSession {
    #[instrument(skip(self))]
    fn current_organization(&self) -> Result<Organization, SessionError> {
        let config = self.read_config()?;

        if config.access_token.is_empty() {
            return Err(SessionError::NotLoggedIn);
        }

        let fields = config.organization_fields;
        if fields.name.is_empty() {
            return Err(SessionError::NoOrgTargeted);
        }

        debug!("Targeted organization {} on {}", fields.name, config.target);
        Ok(Organization {
            name: fields.name,
            guid: fields.guid,
        })
    }

    #[instrument(skip(self))]
    fn organization_details(&self, name: &str) -> Result<OrganizationDetails, SessionError> {
        let org = self.find_organization(name)?;
        let domains = self.list_domains(&org.guid)?;

        Ok(OrganizationDetails {
            name: org.name,
            guid: org.guid,
            domains,
        })
    }
}

fn decode_page<'a, T: Deserialize<'a>>(path: &str, body: &'a str) -> Result<T, SessionError> {
    serde_json::from_str(body).map_err(|source| SessionError::ApiDecode {
        path: path.to_string(),
        source,
    })
}

fn check_api_errors(path: &str, errors: &[ApiError]) -> Result<(), SessionError> {
    match errors.first() {
        Some(error) => Err(SessionError::Api {
            path: path.to_string(),
            message: format!("{}: {}", error.title, error.detail),
        }),
        None => Ok(()),
    }
}

/// API path with an encoded query string
fn build_path(path: &str, query: &[(&str, &str)]) -> Result<String, SessionError> {
    let url = Url::parse_with_params(&format!("{API_ORIGIN}{path}"), query).map_err(|e| {
        SessionError::Api {
            path: path.to_string(),
            message: e.to_string(),
        }
    })?;
    Ok(path_and_query(&url))
}

/// `cf curl` wants a path; pagination links are absolute URLs
fn path_of(href: &str) -> Result<String, SessionError> {
    if href.starts_with('/') {
        return Ok(href.to_string());
    }

    Url::parse(href)
        .map(|url| path_and_query(&url))
        .map_err(|e| SessionError::Api {
            path: href.to_string(),
            message: format!("invalid pagination link: {e}"),
        })
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
