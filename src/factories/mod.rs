pub mod brain_factory;
