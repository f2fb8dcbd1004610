/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// The client type needs a `sender` field for the request enum, and the error
/// type an `Unavailable(String)` variant for a closed or dropped actor.
macro_rules! client_method {
    ($client:ty => $vis:vis fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident, Error = $error_type:ty) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            $vis async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender
                    .send($request::$variant {
                        $($param,)*
                        respond_to,
                    })
                    .await
                    .map_err(|_| <$error_type>::Unavailable("Actor closed".to_string()))?;

                response
                    .await
                    .map_err(|_| <$error_type>::Unavailable("Actor dropped".to_string()))?
            }
        }
    };
}

pub(crate) use client_method;
