pub mod error;
pub mod observation;
pub mod qualifier;
pub mod series;
pub mod statistics;
