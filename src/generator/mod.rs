pub mod word_source;
