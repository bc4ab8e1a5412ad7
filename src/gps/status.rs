/// Coarse engine state reported to the status callback
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    SessionBegin,
    SessionEnd,
    EngineOn,
    EngineOff,
}

bitflags! {
    /// Capabilities announced once the engine is running
    pub struct Capabilities: u32 {
        const SCHEDULING     = 0x0001;
        const MSB            = 0x0002;
        const MSA            = 0x0004;
        const SINGLE_SHOT    = 0x0008;
        const ON_DEMAND_TIME = 0x0010;
    }
}
