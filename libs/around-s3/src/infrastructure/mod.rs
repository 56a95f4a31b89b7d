mod s3_media_store;

pub use s3_media_store::S3MediaStore;
