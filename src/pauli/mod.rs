pub mod operator;
pub mod string;

pub use self::operator::QubitOperator;
pub use self::string::PauliString;
