/// The configuration dialect a parse tree was produced under.
///
/// Dialect selection happens upstream, before parsing; nothing in the walk or
/// the extraction ever switches dialect mid-tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Ios,
    IosXr,
    Nxos,
    Asa,
    Aruba,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dialect::Ios => "IOS",
            Dialect::IosXr => "IOS-XR",
            Dialect::Nxos => "NX-OS",
            Dialect::Asa => "ASA",
            Dialect::Aruba => "Aruba",
        };
        write!(f, "{name}")
    }
}

impl Dialect {
    /// Name of the VRF that interfaces land in when no `vrf forwarding` line
    /// assigns one.
    pub fn default_vrf(&self) -> &'static str {
        "default"
    }

    /// Name of the VRF that management-plane interfaces (`mgmt0`,
    /// `Management1`, ...) are placed in.
    pub fn management_vrf(&self) -> &'static str {
        "management"
    }
}
