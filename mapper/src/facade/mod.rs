//! Public entry points: [`MapperFactory`] for configuration and
//! [`MapperFacade`] for mapping

mod factory;
mod mapper_facade;


pub use factory::{MapperFactory, MapperFactoryBuilder};
pub use mapper_facade::MapperFacade;
