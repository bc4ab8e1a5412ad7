use crate::nmea::Token;

/// The sentences the reader understands
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SentenceType {
    GGA,
    GLL,
    GSA,
    GSV,
    RMC,
    VTG,
    ZDA,
    Unrecognized,
}

impl SentenceType {
    /// Shortest sentence ID, two talker characters followed by the type
    pub const ID_LEN: usize = 5;

    /// Classify a sentence by its ID, ignoring the talker.
    ///
    /// IDs shorter than `ID_LEN` are `None`.
    pub fn from_id(id: Token<'_>) -> Option<Self> {
        let kind = match id.slice(2, Self::ID_LEN)? {
            b"GGA" => SentenceType::GGA,
            b"GLL" => SentenceType::GLL,
            b"GSA" => SentenceType::GSA,
            b"GSV" => SentenceType::GSV,
            b"RMC" => SentenceType::RMC,
            b"VTG" => SentenceType::VTG,
            b"ZDA" => SentenceType::ZDA,
            _ => SentenceType::Unrecognized,
        };

        Some(kind)
    }
}
