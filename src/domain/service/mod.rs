pub mod message_domain_service;

#[cfg(test)]
mod message_domain_service_test;

pub use message_domain_service::MessageDomainService;
