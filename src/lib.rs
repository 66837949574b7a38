pub mod broadlink;
pub mod codecs;
pub mod mirage;
pub mod pwm;
pub mod smartir;
