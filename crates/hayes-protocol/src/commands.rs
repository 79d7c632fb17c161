//! The AT command rule table.
//!
//! Commands are matched against the uppercased input line in table order.
//! Exact rules are listed before any prefix rule that could shadow them, so
//! first-match-wins resolution is deterministic by construction. Handlers
//! that take a value argument (`AT$SSID=...`, `AT&Z0=...`) re-read the value
//! from the original case-preserving line; only matching is case-folded.

/// How a table entry compares against the uppercased command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// The whole line must equal the pattern.
    Exact(&'static str),
    /// The line must start with the pattern; the remainder is handler input.
    Prefix(&'static str),
}

impl Matcher {
    /// Check this matcher against an uppercased line.
    pub fn matches(&self, up: &str) -> bool {
        match self {
            Matcher::Exact(pat) => up == *pat,
            Matcher::Prefix(pat) => up.starts_with(pat),
        }
    }

    /// The raw pattern string.
    pub fn pattern(&self) -> &'static str {
        match self {
            Matcher::Exact(pat) | Matcher::Prefix(pat) => pat,
        }
    }
}

/// Identifies which handler an AT command line routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    /// Bare `AT` attention check.
    Attention,
    /// `ATNET0` / `ATNET1` / `ATNET?` Telnet framing control.
    TelnetMode,
    /// `ATA` answer a pending inbound call.
    Answer,
    /// `AT?` / `ATHELP` command summary.
    Help,
    /// `ATZ` reload the stored profile.
    ReloadProfile,
    /// `ATC0` / `ATC1` Wi-Fi disconnect/connect.
    WifiConnection,
    /// `ATI` network status report.
    NetworkInfo,
    /// `AT&V` show active and stored profiles.
    ProfileView,
    /// `AT&W` persist the active profile.
    ProfileWrite,
    /// `AT$FW` start the firmware update flow.
    FirmwareUpdate,
    /// `AT&F` restore factory defaults.
    FactoryReset,
    /// `ATS0=0` / `ATS0=1` / `ATS0?` auto-answer register.
    AutoAnswer,
    /// `ATHEX=0` / `ATHEX=1` hex echo of accepted characters.
    HexEcho,
    /// `ATO` return to Data Mode on an active call.
    Online,
    /// `ATSCAN` scan for Wi-Fi networks.
    WifiScan,
    /// `ATIP?` report the local IP address.
    IpAddress,
    /// `AT$HRESET` wipe settings and reboot.
    HardReset,
    /// `ATDT` / `ATDP` / `ATDI` / `ATDS` dial a host, slot, or PPP target.
    Dial,
    /// `ATSSH` dial out over SSH.
    SshDial,
    /// `ATE0` / `ATE1` / `ATE?` local echo.
    Echo,
    /// `ATV0` / `ATV1` / `ATV?` verbose result codes.
    Verbose,
    /// `AT&P0` / `AT&P1` / `AT&P?` carrier-detect pin polarity.
    PinPolarity,
    /// `AT&K0`..`AT&K2` / `AT&K?` flow control kind.
    FlowControl,
    /// `AT$SB=` / `AT$SB?` serial speed.
    BaudRate,
    /// `AT$BM=` / `AT$BM?` busy message.
    BusyMessage,
    /// `AT&Z<n>=` / `AT&Z<n>?` speed-dial slots.
    SpeedDial,
    /// `AT$SSID=` / `AT$SSID?` Wi-Fi network name.
    Ssid,
    /// `AT$PASS=` / `AT$PASS?` Wi-Fi password.
    Password,
    /// `ATH` hang up.
    Hangup,
    /// `AT$RB` reboot.
    Reboot,
    /// `AT$SP=` / `AT$SP?` inbound listen port.
    ListenPort,
    /// `ATGET<url>` inline HTTP fetch.
    HttpGet,
    /// `ATGPH<url>` inline Gopher fetch.
    Gopher,
    /// `ATQ0` / `ATQ1` / `ATQ?` quiet mode.
    Quiet,
}

/// The ordered dispatch table. Exact matches first, then prefixes.
///
/// The relative order within each group follows the classic table this
/// emulator reproduces; re-ordering entries can change which handler fires
/// for lines like `ATS0=1` (exact) vs `ATSSH...` (prefix) and is covered by
/// tests below.
pub const COMMAND_TABLE: &[(Matcher, CommandId)] = &[
    // Exact matches first
    (Matcher::Exact("AT"), CommandId::Attention),
    (Matcher::Exact("ATNET0"), CommandId::TelnetMode),
    (Matcher::Exact("ATNET1"), CommandId::TelnetMode),
    (Matcher::Exact("ATNET?"), CommandId::TelnetMode),
    (Matcher::Exact("ATA"), CommandId::Answer),
    (Matcher::Exact("AT?"), CommandId::Help),
    (Matcher::Exact("ATHELP"), CommandId::Help),
    (Matcher::Exact("ATZ"), CommandId::ReloadProfile),
    (Matcher::Exact("ATC0"), CommandId::WifiConnection),
    (Matcher::Exact("ATC1"), CommandId::WifiConnection),
    (Matcher::Exact("ATI"), CommandId::NetworkInfo),
    (Matcher::Exact("AT&V"), CommandId::ProfileView),
    (Matcher::Exact("AT&W"), CommandId::ProfileWrite),
    (Matcher::Exact("AT$FW"), CommandId::FirmwareUpdate),
    (Matcher::Exact("AT$SSID?"), CommandId::Ssid),
    (Matcher::Exact("AT$PASS?"), CommandId::Password),
    (Matcher::Exact("AT&F"), CommandId::FactoryReset),
    (Matcher::Exact("ATS0=0"), CommandId::AutoAnswer),
    (Matcher::Exact("ATS0=1"), CommandId::AutoAnswer),
    (Matcher::Exact("ATS0?"), CommandId::AutoAnswer),
    (Matcher::Exact("ATHEX=1"), CommandId::HexEcho),
    (Matcher::Exact("ATHEX=0"), CommandId::HexEcho),
    (Matcher::Exact("ATO"), CommandId::Online),
    (Matcher::Exact("ATSCAN"), CommandId::WifiScan),
    (Matcher::Exact("AT$SP?"), CommandId::ListenPort),
    (Matcher::Exact("ATIP?"), CommandId::IpAddress),
    (Matcher::Exact("AT$SB?"), CommandId::BaudRate),
    (Matcher::Exact("AT$BM?"), CommandId::BusyMessage),
    (Matcher::Exact("AT$HRESET"), CommandId::HardReset),
    // Prefix matches
    (Matcher::Prefix("ATDT"), CommandId::Dial),
    (Matcher::Prefix("ATSSH"), CommandId::SshDial),
    (Matcher::Prefix("ATDP"), CommandId::Dial),
    (Matcher::Prefix("ATDI"), CommandId::Dial),
    (Matcher::Prefix("ATDS"), CommandId::Dial),
    (Matcher::Prefix("ATE"), CommandId::Echo),
    (Matcher::Prefix("ATV"), CommandId::Verbose),
    (Matcher::Prefix("AT&P"), CommandId::PinPolarity),
    (Matcher::Prefix("AT&K"), CommandId::FlowControl),
    (Matcher::Prefix("AT$SB="), CommandId::BaudRate),
    (Matcher::Prefix("AT$BM="), CommandId::BusyMessage),
    (Matcher::Prefix("AT&Z"), CommandId::SpeedDial),
    (Matcher::Prefix("AT$SSID="), CommandId::Ssid),
    (Matcher::Prefix("AT$PASS="), CommandId::Password),
    (Matcher::Prefix("ATH"), CommandId::Hangup),
    (Matcher::Prefix("AT$RB"), CommandId::Reboot),
    (Matcher::Prefix("AT$SP="), CommandId::ListenPort),
    (Matcher::Prefix("ATGET"), CommandId::HttpGet),
    (Matcher::Prefix("ATGPH"), CommandId::Gopher),
    (Matcher::Prefix("ATQ"), CommandId::Quiet),
];

/// Resolve an uppercased command line to its handler. First match wins;
/// `None` means "unknown command" and the caller reports ERROR.
pub fn resolve(up: &str) -> Option<CommandId> {
    COMMAND_TABLE
        .iter()
        .find(|(matcher, _)| matcher.matches(up))
        .map(|(_, id)| *id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_matches() {
        assert_eq!(resolve("AT"), Some(CommandId::Attention));
        assert_eq!(resolve("ATA"), Some(CommandId::Answer));
        assert_eq!(resolve("ATZ"), Some(CommandId::ReloadProfile));
        assert_eq!(resolve("AT&V"), Some(CommandId::ProfileView));
        assert_eq!(resolve("ATNET1"), Some(CommandId::TelnetMode));
    }

    #[test]
    fn test_prefix_matches() {
        assert_eq!(resolve("ATDTBBS.EXAMPLE.COM:23"), Some(CommandId::Dial));
        assert_eq!(resolve("ATDS3"), Some(CommandId::Dial));
        assert_eq!(resolve("ATE1"), Some(CommandId::Echo));
        assert_eq!(resolve("AT&Z0=HOST:23"), Some(CommandId::SpeedDial));
        assert_eq!(resolve("AT$SSID=MYNET"), Some(CommandId::Ssid));
        assert_eq!(resolve("ATH0"), Some(CommandId::Hangup));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(resolve("ATXYZ"), None);
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("HELLO"), None);
    }

    #[test]
    fn test_exact_beats_prefix() {
        // ATS0=1 must hit the exact auto-answer rule, not the ATSSH prefix
        // (it can't) or any other prefix rule.
        assert_eq!(resolve("ATS0=1"), Some(CommandId::AutoAnswer));
        // ATHELP is exact and must not fall into the ATH hangup prefix.
        assert_eq!(resolve("ATHELP"), Some(CommandId::Help));
        // AT$SB? is exact; AT$SB= is the mutating prefix form.
        assert_eq!(resolve("AT$SB?"), Some(CommandId::BaudRate));
        assert_eq!(resolve("AT$SB=9600"), Some(CommandId::BaudRate));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for (matcher, id) in COMMAND_TABLE {
            let line = matcher.pattern();
            let first = resolve(line);
            let second = resolve(line);
            assert_eq!(first, second, "unstable resolution for {line}");
            // The pattern itself must resolve to a handler (possibly an
            // earlier entry, e.g. ATNET0 exact shadowing nothing).
            assert!(first.is_some(), "pattern {line} resolves to nothing");
            let _ = id;
        }
    }

    #[test]
    fn test_no_exact_rule_shadowed_by_earlier_prefix() {
        // Ordering invariant: for every exact pattern, no prefix rule listed
        // before it may match that pattern.
        for (i, (matcher, _)) in COMMAND_TABLE.iter().enumerate() {
            if let Matcher::Exact(pat) = matcher {
                for (earlier, _) in &COMMAND_TABLE[..i] {
                    if let Matcher::Prefix(p) = earlier {
                        assert!(
                            !pat.starts_with(p),
                            "exact rule {pat} shadowed by prefix {p}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_exact_rules_precede_prefix_rules() {
        let first_prefix = COMMAND_TABLE
            .iter()
            .position(|(m, _)| matches!(m, Matcher::Prefix(_)))
            .expect("table has prefix rules");
        for (m, _) in &COMMAND_TABLE[first_prefix..] {
            assert!(
                matches!(m, Matcher::Prefix(_)),
                "exact rule listed after first prefix rule"
            );
        }
    }
}
