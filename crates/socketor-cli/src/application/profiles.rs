//! Building connection profiles from a kind plus user overrides.
//!
//! A new profile starts from [`ConnectionConfig::with_defaults`] for the
//! chosen kind.  Each `Some` field of [`ProfileOverrides`] then replaces the
//! matching default.  Fields only make sense for some kinds (a WebSocket
//! client has an `address`, not a `host` and `port`); offering one to a kind
//! that has no such field is an error, never silently ignored.

use std::num::NonZeroUsize;

use thiserror::Error;

use socketor_core::{ConfigError, ConnectionConfig, ConnectionKind};

#[derive(Debug, Error)]
pub enum ProfileError {
    /// The override names a field the chosen kind does not have.
    #[error("`{field}` does not apply to {kind} profiles")]
    NotApplicable {
        field: &'static str,
        kind: ConnectionKind,
    },

    /// The resulting profile failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Optional replacements for profile defaults.
///
/// `host` and `port` mean the peer for client kinds (`target_host` /
/// `target_port` for a UDP client) and the bind address for server kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// WebSocket client only.
    pub address: Option<String>,
    /// UDP client only.
    pub local_port: Option<u16>,
    /// TCP server only.
    pub server_id: Option<String>,
    pub max_entries: Option<NonZeroUsize>,
    pub show_as_hex: Option<bool>,
    pub send_as_hex: Option<bool>,
}

/// Builds a validated profile of `kind` with `overrides` applied.
///
/// # Errors
///
/// - [`ProfileError::NotApplicable`] for an override the kind has no field
///   for.
/// - [`ProfileError::Config`] when the finished profile does not validate
///   (an empty host, a zero peer port, a non-`ws` address).
pub fn build_profile(
    kind: ConnectionKind,
    overrides: &ProfileOverrides,
) -> Result<ConnectionConfig, ProfileError> {
    let not_applicable = |field| ProfileError::NotApplicable { field, kind };
    let mut config = ConnectionConfig::with_defaults(kind);

    match &mut config {
        ConnectionConfig::TcpClient(c) => {
            apply(&mut c.host, &overrides.host);
            apply(&mut c.port, &overrides.port);
        }
        ConnectionConfig::UdpClient(c) => {
            apply(&mut c.target_host, &overrides.host);
            apply(&mut c.target_port, &overrides.port);
            if overrides.local_port.is_some() {
                c.local_port = overrides.local_port;
            }
        }
        ConnectionConfig::WebSocketClient(c) => {
            if overrides.host.is_some() {
                return Err(not_applicable("host"));
            }
            if overrides.port.is_some() {
                return Err(not_applicable("port"));
            }
            apply(&mut c.address, &overrides.address);
        }
        ConnectionConfig::TcpServer(c) => {
            apply(&mut c.host, &overrides.host);
            apply(&mut c.port, &overrides.port);
            apply(&mut c.server_id, &overrides.server_id);
        }
        ConnectionConfig::WebSocketServer(c) => {
            apply(&mut c.host, &overrides.host);
            apply(&mut c.port, &overrides.port);
        }
    }

    if overrides.address.is_some() && kind != ConnectionKind::WebSocketClient {
        return Err(not_applicable("address"));
    }
    if overrides.local_port.is_some() && kind != ConnectionKind::UdpClient {
        return Err(not_applicable("local_port"));
    }
    if overrides.server_id.is_some() && kind != ConnectionKind::TcpServer {
        return Err(not_applicable("server_id"));
    }

    let message_box = config.message_box_mut();
    apply(&mut message_box.max_entries, &overrides.max_entries);
    apply(&mut message_box.show_as_hex, &overrides.show_as_hex);
    apply(&mut config.send_box_mut().send_as_hex, &overrides.send_as_hex);

    config.validate()?;
    Ok(config)
}

fn apply<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides() -> ProfileOverrides {
        ProfileOverrides::default()
    }

    #[test]
    fn test_no_overrides_gives_kind_defaults() {
        for kind in ConnectionKind::ALL {
            let config = build_profile(kind, &overrides()).unwrap();
            assert_eq!(config, ConnectionConfig::with_defaults(kind));
        }
    }

    #[test]
    fn test_tcp_client_host_and_port() {
        // Arrange
        let o = ProfileOverrides {
            host: Some("10.0.0.5".to_string()),
            port: Some(7000),
            ..overrides()
        };

        // Act
        let config = build_profile(ConnectionKind::TcpClient, &o).unwrap();

        // Assert
        assert_eq!(config.endpoint(), "10.0.0.5:7000");
    }

    #[test]
    fn test_udp_client_host_and_port_target_the_peer() {
        let o = ProfileOverrides {
            host: Some("192.168.1.20".to_string()),
            port: Some(9999),
            local_port: Some(40000),
            ..overrides()
        };
        let config = build_profile(ConnectionKind::UdpClient, &o).unwrap();
        match config {
            ConnectionConfig::UdpClient(c) => {
                assert_eq!(c.target_host, "192.168.1.20");
                assert_eq!(c.target_port, 9999);
                assert_eq!(c.local_port, Some(40000));
            }
            other => panic!("expected UdpClient, got {other:?}"),
        }
    }

    #[test]
    fn test_websocket_client_rejects_host() {
        let o = ProfileOverrides {
            host: Some("example.com".to_string()),
            ..overrides()
        };
        let err = build_profile(ConnectionKind::WebSocketClient, &o).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::NotApplicable {
                field: "host",
                kind: ConnectionKind::WebSocketClient
            }
        ));
    }

    #[test]
    fn test_address_only_applies_to_websocket_client() {
        let o = ProfileOverrides {
            address: Some("ws://example.com/socket".to_string()),
            ..overrides()
        };
        let config = build_profile(ConnectionKind::WebSocketClient, &o).unwrap();
        assert_eq!(config.endpoint(), "ws://example.com/socket");

        let err = build_profile(ConnectionKind::TcpClient, &o).unwrap_err();
        assert!(matches!(err, ProfileError::NotApplicable { field: "address", .. }));
    }

    #[test]
    fn test_server_id_only_applies_to_tcp_server() {
        let o = ProfileOverrides {
            server_id: Some("srv-1".to_string()),
            ..overrides()
        };
        assert!(build_profile(ConnectionKind::TcpServer, &o).is_ok());
        assert!(matches!(
            build_profile(ConnectionKind::WebSocketServer, &o),
            Err(ProfileError::NotApplicable { field: "server_id", .. })
        ));
    }

    #[test]
    fn test_local_port_only_applies_to_udp_client() {
        let o = ProfileOverrides {
            local_port: Some(5000),
            ..overrides()
        };
        assert!(matches!(
            build_profile(ConnectionKind::TcpClient, &o),
            Err(ProfileError::NotApplicable { field: "local_port", .. })
        ));
    }

    #[test]
    fn test_display_and_send_overrides_apply_to_every_kind() {
        let o = ProfileOverrides {
            max_entries: NonZeroUsize::new(50),
            show_as_hex: Some(true),
            send_as_hex: Some(true),
            ..overrides()
        };
        for kind in ConnectionKind::ALL {
            let config = build_profile(kind, &o).unwrap();
            assert_eq!(config.message_box().max_entries.get(), 50);
            assert!(config.message_box().show_as_hex);
            assert!(config.send_box().send_as_hex);
        }
    }

    #[test]
    fn test_invalid_result_is_rejected() {
        // Arrange: a zero peer port cannot be dialled
        let o = ProfileOverrides {
            port: Some(0),
            ..overrides()
        };

        // Act
        let err = build_profile(ConnectionKind::TcpClient, &o).unwrap_err();

        // Assert
        assert!(matches!(
            err,
            ProfileError::Config(ConfigError::InvalidField { field: "port", .. })
        ));
    }

    #[test]
    fn test_server_accepts_ephemeral_port() {
        let o = ProfileOverrides {
            port: Some(0),
            ..overrides()
        };
        assert!(build_profile(ConnectionKind::TcpServer, &o).is_ok());
    }

    #[test]
    fn test_non_websocket_address_is_rejected() {
        let o = ProfileOverrides {
            address: Some("http://example.com".to_string()),
            ..overrides()
        };
        let err = build_profile(ConnectionKind::WebSocketClient, &o).unwrap_err();
        assert!(matches!(err, ProfileError::Config(_)));
    }
}
