pub mod price_provider;
pub mod yahoo;

#[cfg(test)]
pub mod stub;
