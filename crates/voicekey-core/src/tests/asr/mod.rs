mod dispatcher;
mod tencent;
mod volcengine;
