pub mod companymodel;
pub mod filemodel;
pub mod jobmodel;
pub mod positionmodel;
pub mod usermodel;
