pub mod config;
pub mod consts;
pub mod error;
pub mod fermion;
pub mod mapper;
pub mod optimizer;
pub mod pauli;
pub mod scorer;
pub mod tableau;

pub use crate::error::{MapperError, MfResult};
pub use crate::fermion::FermionicOp;
pub use crate::mapper::{
    FermionQubitMapper, JordanWignerMapper, MajoranaMapper, MapperOptions, PairTable, Strategy,
};
pub use crate::pauli::{PauliString, QubitOperator};
