//! Repository implementations for all CartPass entities.

pub mod activation;
pub mod batch;
pub mod beneficiary;
pub mod lga;
pub mod sticker;
pub mod verification;

pub use activation::ActivationRepository;
pub use batch::BatchRepository;
pub use beneficiary::BeneficiaryRepository;
pub use lga::LgaRepository;
pub use sticker::StickerRepository;
pub use verification::VerificationLogRepository;
