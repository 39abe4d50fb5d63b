//! Command handler
//!
//! Resolves the organization's willitconnect URL from the session and runs
//! one check against it.

use crate::{
    core::{
        checker::{CheckRequest, ConnectivityCheck, Verdict, check_url},
        session::Session,
    },
    error::{Result, SessionError, WicError},
};
use std::io::Write;
use tracing::{debug, info, instrument};

/// Host and port to check, taken verbatim from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub host: String,
    pub port: String,
}

impl InvocationRequest {
    /// First two positional arguments; anything after them is ignored
    pub fn from_positionals(args: &[String]) -> Result<Self> {
        match args {
            [host, port, ..] => Ok(Self {
                host: host.clone(),
                port: port.clone(),
            }),
            _ => Err(WicError::Usage),
        }
    }
}

/// Runs the `willitconnect` command against a session and a checker
pub struct CommandHandler<'a, S: ?Sized, C: ?Sized> {
    session: &'a S,
    checker: &'a C,
}

impl<'a, S, C> CommandHandler<'a, S, C>
where
    S: Session + ?Sized,
    C: ConnectivityCheck + ?Sized,
{
    #[must_use]
    pub const fn new(session: &'a S, checker: &'a C) -> Self {
        Self { session, checker }
    }

    /// Run one check.
    ///
    /// Writes the diagnostic line and the verdict to `out`. Failures are
    /// returned; their `Display` is the message to show the user.
    #[instrument(skip(self, out))]
    pub fn run<W: Write>(&self, args: &[String], out: &mut W) -> Result<Verdict> {
        let request = InvocationRequest::from_positionals(args)?;
        let url = self.resolve_url()?;

        writeln!(
            out,
            "Host: {} - Port: {} - WillItConnect: {}",
            request.host, request.port, url
        )?;

        let response = self
            .checker
            .check(&url, &CheckRequest::new(&request.host, &request.port))?;
        let verdict = Verdict::from(&response);
        info!("Check of {}:{} finished: {:?}", request.host, request.port, verdict);

        writeln!(out, "{verdict}")?;
        Ok(verdict)
    }

    /// Work out the willitconnect URL of the targeted organization
    fn resolve_url(&self) -> Result<String> {
        // Logged in without a targeted org is an org problem, not a login one.
        let org = match self.session.current_organization() {
            Ok(org) => org,
            Err(e @ SessionError::NoOrgTargeted) => return Err(WicError::org_not_found("", e)),
            Err(e) => return Err(WicError::not_logged_in(e)),
        };
        debug!("Current organization: {}", org.name);

        let details = self
            .session
            .organization_details(&org.name)
            .map_err(|e| WicError::org_not_found(&org.name, e))?;

        let base_domain = details
            .base_domain()
            .ok_or_else(|| WicError::domain_not_found(&org.name))?;
        debug!("Using base domain {}", base_domain);

        Ok(check_url(base_domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        checker::CheckResponse,
        session::{Domain, Organization, OrganizationDetails},
    };
    use std::cell::{Cell, RefCell};

    /// Session with canned answers that counts how often it is asked
    #[derive(Default)]
    struct StubSession {
        logged_out: bool,
        no_org_targeted: bool,
        unknown_org: bool,
        domains: Vec<&'static str>,
        calls: Cell<usize>,
    }

    impl StubSession {
        fn with_domains(domains: &[&'static str]) -> Self {
            Self {
                domains: domains.to_vec(),
                ..Self::default()
            }
        }
    }

    impl Session for StubSession {
        fn current_organization(&self) -> std::result::Result<Organization, SessionError> {
            self.calls.set(self.calls.get() + 1);
            if self.logged_out {
                return Err(SessionError::NotLoggedIn);
            }
            if self.no_org_targeted {
                return Err(SessionError::NoOrgTargeted);
            }
            Ok(Organization {
                name: "my-org".to_string(),
                guid: "org-guid".to_string(),
            })
        }

        fn organization_details(
            &self,
            name: &str,
        ) -> std::result::Result<OrganizationDetails, SessionError> {
            self.calls.set(self.calls.get() + 1);
            if self.unknown_org {
                return Err(SessionError::OrgNotFound {
                    name: name.to_string(),
                });
            }
            Ok(OrganizationDetails {
                name: name.to_string(),
                guid: "org-guid".to_string(),
                domains: self
                    .domains
                    .iter()
                    .map(|name| Domain {
                        name: (*name).to_string(),
                    })
                    .collect(),
            })
        }
    }

    /// Checker that records what it was asked and answers from a script
    struct StubChecker {
        reply: fn() -> Result<CheckResponse>,
        seen: RefCell<Vec<(String, String)>>,
    }

    impl StubChecker {
        fn replying(reply: fn() -> Result<CheckResponse>) -> Self {
            Self {
                reply,
                seen: RefCell::new(Vec::new()),
            }
        }

        fn reachable() -> Self {
            Self::replying(|| {
                Ok(CheckResponse {
                    can_connect: true,
                    http_status: 200,
                    ..CheckResponse::default()
                })
            })
        }

        fn calls(&self) -> usize {
            self.seen.borrow().len()
        }
    }

    impl ConnectivityCheck for StubChecker {
        fn check(&self, url: &str, request: &CheckRequest) -> Result<CheckResponse> {
            self.seen.borrow_mut().push((
                url.to_string(),
                serde_json::to_string(request).unwrap(),
            ));
            (self.reply)()
        }
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn run(
        session: &StubSession,
        checker: &StubChecker,
        values: &[&str],
    ) -> (Result<Verdict>, String) {
        let mut out = Vec::new();
        let result = CommandHandler::new(session, checker).run(&args(values), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_from_positionals() {
        let request = InvocationRequest::from_positionals(&args(&["h", "p", "x"])).unwrap();
        assert_eq!(request.host, "h");
        assert_eq!(request.port, "p");

        assert!(matches!(
            InvocationRequest::from_positionals(&args(&["h"])),
            Err(WicError::Usage)
        ));
    }

    #[test]
    fn test_too_few_arguments_prints_usage_and_touches_nothing() {
        for values in [&[][..], &["10.0.0.1"][..]] {
            let session = StubSession::with_domains(&["example.com"]);
            let checker = StubChecker::reachable();

            let (result, output) = run(&session, &checker, values);
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), "Usage: cf willitconnect <host> <port>");
            assert!(output.is_empty());
            assert_eq!(session.calls.get(), 0);
            assert_eq!(checker.calls(), 0);
        }
    }

    #[test]
    fn test_logged_out_session() {
        let session = StubSession {
            logged_out: true,
            ..StubSession::with_domains(&["example.com"])
        };
        let checker = StubChecker::reachable();

        let (result, _) = run(&session, &checker, &["10.0.0.1", "443"]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Unable to connect to CF, use cf login first"
        );
        assert_eq!(checker.calls(), 0);
    }

    #[test]
    fn test_no_org_targeted_points_at_cf_target() {
        let session = StubSession {
            no_org_targeted: true,
            ..StubSession::with_domains(&["example.com"])
        };
        let checker = StubChecker::reachable();

        let (result, output) = run(&session, &checker, &["10.0.0.1", "443"]);
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to find valid org, please view cf target"
        );
        assert_eq!(err.exit_code(), 4);
        assert!(output.is_empty());
        assert_eq!(session.calls.get(), 1);
        assert_eq!(checker.calls(), 0);
    }

    #[test]
    fn test_unknown_org() {
        let session = StubSession {
            unknown_org: true,
            ..StubSession::default()
        };
        let checker = StubChecker::reachable();

        let (result, _) = run(&session, &checker, &["10.0.0.1", "443"]);
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to find valid org, please view cf target"
        );
        assert_eq!(err.exit_code(), 4);
        assert_eq!(checker.calls(), 0);
    }

    #[test]
    fn test_empty_domain_list() {
        let session = StubSession::with_domains(&[]);
        let checker = StubChecker::reachable();

        let (result, output) = run(&session, &checker, &["10.0.0.1", "443"]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Unable to find valid domain, please view cf domains"
        );
        assert!(output.is_empty());
        assert_eq!(checker.calls(), 0);
    }

    #[test]
    fn test_first_domain_empty_name() {
        let session = StubSession::with_domains(&["", "example.com"]);
        let checker = StubChecker::reachable();

        let (result, _) = run(&session, &checker, &["10.0.0.1", "443"]);
        assert!(matches!(result, Err(WicError::DomainNotFound { .. })));
        assert_eq!(checker.calls(), 0);
    }

    #[test]
    fn test_url_and_body_for_first_domain() {
        let session = StubSession::with_domains(&["example.com", "other.example.org"]);
        let checker = StubChecker::reachable();

        let (result, output) = run(&session, &checker, &["10.0.0.1", "443"]);
        assert_eq!(result.unwrap(), Verdict::Reachable);
        assert_eq!(
            checker.seen.borrow().as_slice(),
            &[(
                "https://willitconnect.example.com/v2/willitconnect".to_string(),
                r#"{"target":"10.0.0.1:443"}"#.to_string(),
            )]
        );
        assert_eq!(
            output,
            "Host: 10.0.0.1 - Port: 443 - WillItConnect: https://willitconnect.example.com/v2/willitconnect\n\
             I am able to connect\n"
        );
    }

    #[test]
    fn test_unreachable_target() {
        let session = StubSession::with_domains(&["example.com"]);
        let checker = StubChecker::replying(|| Ok(CheckResponse::default()));

        let (result, output) = run(&session, &checker, &["db.internal", "5432"]);
        assert_eq!(result.unwrap(), Verdict::Unreachable);
        assert!(output.ends_with("I am unable to connect\n"));
    }

    #[test]
    fn test_checker_failure_is_returned_after_diagnostic_line() {
        let session = StubSession::with_domains(&["example.com"]);
        let checker = StubChecker::replying(|| {
            Err(WicError::invalid_response(std::io::Error::other(
                "unexpected end of body",
            )))
        });

        let (result, output) = run(&session, &checker, &["db.internal", "5432"]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid response from willitconnect: unexpected end of body"
        );
        assert!(output.starts_with("Host: db.internal - Port: 5432 - "));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let session = StubSession::with_domains(&["example.com"]);
        let checker = StubChecker::reachable();

        let (first, first_output) = run(&session, &checker, &["10.0.0.1", "443"]);
        let (second, second_output) = run(&session, &checker, &["10.0.0.1", "443"]);
        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(first_output, second_output);
        assert_eq!(checker.calls(), 2);
    }
}
