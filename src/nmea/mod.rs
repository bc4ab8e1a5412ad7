pub mod field;
mod framer;
mod reader;
mod sentence_type;
mod tokenizer;

pub use field::FieldError;
pub use framer::LineFramer;
pub use framer::NMEA_MAX_SIZE;
pub use reader::NmeaReader;
pub use reader::ReaderState;
pub use reader::MIN_SENTENCE_LEN;
pub use sentence_type::SentenceType;
pub use tokenizer::Token;
pub use tokenizer::Tokenizer;
pub use tokenizer::MAX_TOKENS;


#[cfg(test)]
mod test_field;

#[cfg(test)]
mod test_framer;

#[cfg(test)]
mod test_tokenizer;
