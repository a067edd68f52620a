/// How registration treats keys that do not have the `class.method(params)return` shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Log a warning and register the entry anyway. It can never be found by a well-formed lookup.
    #[default]
    Lenient,
    /// Refuse the whole module.
    Strict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BridgeOptions {
    /// Log every native call with its signature and argument count.
    pub trace: bool,
    pub key_policy: KeyPolicy,
    /// Compare each descriptor's slot count with the one implied by its key.
    pub check_slots: bool,
}

impl BridgeOptions {
    pub fn strict() -> Self {
        Self {
            trace: false,
            key_policy: KeyPolicy::Strict,
            check_slots: true,
        }
    }
}
