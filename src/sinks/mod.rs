pub mod fluentd;
