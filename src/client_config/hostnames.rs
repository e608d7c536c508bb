//! Per-realm hostnames of the platform's signaling and event services.
//!
//! These follow the platform's DNS layout and must stay literal; production
//! does not fit the pattern used by the other realms.

/// The realm whose hosts carry no realm label.
pub const PRODUCTION_REALM: &str = "prod";

struct HostRule {
    production: &'static str,
    /// `{realm}` is replaced with the realm name.
    template: &'static str,
}

impl HostRule {
    fn host_for(&self, realm: &str) -> String {
        if realm == PRODUCTION_REALM {
            self.production.to_string()
        } else {
            self.template.replace("{realm}", realm)
        }
    }
}

const SIGNALING: HostRule = HostRule {
    production: "public-sip0.twilio.com",
    template: "public-sip0.{realm}-us1.twilio.com",
};

const EVENT_GATEWAY: HostRule = HostRule {
    production: "eventgw.twilio.com",
    template: "eventgw.{realm}.twilio.com",
};

/// Signaling (WebSocket SIP) server for a realm.
#[must_use]
pub fn ws_server(realm: &str) -> String {
    SIGNALING.host_for(realm)
}

/// Event gateway host for a realm.
#[must_use]
pub fn event_gateway(realm: &str) -> String {
    EVENT_GATEWAY.host_for(realm)
}
