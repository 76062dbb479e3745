#[derive(thiserror::Error, Debug)]
pub enum ProduceErrorKind {
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ProducerErrorKind<DepsErr, FactoryErr> {
    #[error("Dependencies resolution failed: {0}")]
    Deps(DepsErr),
    #[error("Producer failed: {0}")]
    Factory(FactoryErr),
}
