pub(crate) mod flow_session;
