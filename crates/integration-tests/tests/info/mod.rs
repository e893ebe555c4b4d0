mod contributors;
mod kubernetes;
