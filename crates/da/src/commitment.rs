use alloy::{
    signers::{SignerSync, local::PrivateKeySigner},
    sol,
};
use alloy_primitives::{Address, B256, Bytes, Signature, SignatureError, keccak256};
use alloy_sol_types::SolValue;

sol! {
    /// The DA message format understood by the DA verifier contract.
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    struct BlobData {
        bytes blobID;
        bytes signature;
    }
}

/// Length of the hash prefix in the commitment signature bytes.
const HASH_TO_SIGN_SIZE: usize = 32;

/// A commitment to a blob posted on the DA network: the blob id plus the signed
/// sequence hash. Its ABI encoding is the DA message attached to the L1 sequencing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    /// The DA-assigned identifier of the blob.
    pub blob_id: Bytes,
    /// `hash_to_sign ‖ r ‖ s ‖ v`.
    pub signature: Bytes,
}

impl Commitment {
    /// Signs the sequence hash of `batches` with `signer` and commits it together with the id
    /// of the blob carrying them.
    pub fn sign<B: AsRef<[u8]>>(
        signer: &PrivateKeySigner,
        blob_id: Bytes,
        batches: &[B],
    ) -> alloy::signers::Result<Self> {
        let hash = sequence_hash_to_sign(batches);
        let signature = signer.sign_hash_sync(&hash)?;

        let mut bytes = Vec::with_capacity(HASH_TO_SIGN_SIZE + 65);
        bytes.extend_from_slice(hash.as_slice());
        bytes.extend_from_slice(&signature.as_bytes());

        Ok(Self { blob_id, signature: bytes.into() })
    }

    /// ABI-encodes the commitment into a DA message.
    pub fn encode(&self) -> Bytes {
        BlobData { blobID: self.blob_id.clone(), signature: self.signature.clone() }
            .abi_encode()
            .into()
    }

    /// Decodes a DA message produced by [`Commitment::encode`].
    pub fn decode(message: &[u8]) -> Result<Self, alloy_sol_types::Error> {
        let data = BlobData::abi_decode(message)?;
        Ok(Self { blob_id: data.blobID, signature: data.signature })
    }

    /// The sequence hash carried in front of the signature, if present.
    pub fn hash_to_sign(&self) -> Option<B256> {
        self.signature.get(..HASH_TO_SIGN_SIZE).map(B256::from_slice)
    }

    /// Recovers the address that signed the carried sequence hash.
    pub fn recover_signer(&self) -> Result<Address, SignatureError> {
        let hash = self.hash_to_sign().ok_or(SignatureError::FromBytes("missing hash"))?;
        let signature = Signature::try_from(&self.signature[HASH_TO_SIGN_SIZE..])?;
        signature.recover_address_from_prehash(&hash)
    }
}

/// Computes the chained sequence hash: starting from the zero hash, each batch folds in as
/// `keccak256(acc ‖ keccak256(batch))`.
pub fn sequence_hash_to_sign<B: AsRef<[u8]>>(batches: &[B]) -> B256 {
    batches.iter().fold(B256::ZERO, |acc, batch| {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(acc.as_slice());
        buf[32..].copy_from_slice(keccak256(batch.as_ref()).as_slice());
        keccak256(buf)
    })
}
