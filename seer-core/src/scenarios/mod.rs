//! The catalogue of planted failures. Each scenario runs one deliberately
//! failing operation and is captured on the surface it would occur on.

pub mod analytics;
pub mod audience;
pub mod checkout;
pub mod feature_flag;
pub mod profile;
pub mod warehouse;

use crate::reporting::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    ClientEasy,
    ClientComplex,
    ServerSimple,
    ServerComplex,
    CrossBoundary,
    IntegrationFailure,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::ClientEasy,
        Scenario::ClientComplex,
        Scenario::ServerSimple,
        Scenario::ServerComplex,
        Scenario::CrossBoundary,
        Scenario::IntegrationFailure,
    ];

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scenario| scenario.slug() == slug)
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Scenario::ClientEasy => "client-easy",
            Scenario::ClientComplex => "client-complex",
            Scenario::ServerSimple => "server-simple",
            Scenario::ServerComplex => "server-complex",
            Scenario::CrossBoundary => "cross-boundary",
            Scenario::IntegrationFailure => "integration-failure",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Scenario::ClientEasy => "Client Error – Easy",
            Scenario::ClientComplex => "Client Error – Complex",
            Scenario::ServerSimple => "Server Error – Easy",
            Scenario::ServerComplex => "Server Error – Complex",
            Scenario::CrossBoundary => "Client Visible, Server Root Cause",
            Scenario::IntegrationFailure => "3rd Party Integration Failure",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Scenario::ClientEasy => "Null access in a hydration effect.",
            Scenario::ClientComplex => "Stateful analytics pipeline with unsafe parsing.",
            Scenario::ServerSimple => "Guarded configuration lookup missing fallback.",
            Scenario::ServerComplex => "Chained data hydration and caching failure.",
            Scenario::CrossBoundary => "Client fetch surfaces server validation bug.",
            Scenario::IntegrationFailure => "External API outage bubbled through backend proxy.",
        }
    }

    /// Surface the scenario's own failure is captured on. The API routes
    /// behind the two cross-surface scenarios capture on the server surface
    /// independently.
    pub const fn surface(self) -> Surface {
        match self {
            Scenario::ClientEasy
            | Scenario::ClientComplex
            | Scenario::CrossBoundary
            | Scenario::IntegrationFailure => Surface::Browser,
            Scenario::ServerSimple | Scenario::ServerComplex => Surface::Server,
        }
    }
}
